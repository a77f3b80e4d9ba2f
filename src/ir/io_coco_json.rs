//! COCO JSON writer.
//!
//! # COCO Format Reference
//!
//! COCO bounding boxes use `[x, y, width, height]` where `(x, y)` is the
//! top-left corner in absolute pixels. The converter emits integer boxes,
//! a float `area`, and `iscrowd` as `0`/`1`.
//!
//! Only the detection subset is written: `licenses` is always an empty
//! array and annotations carry no segmentation.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::model::{CocoDocument, DatasetInfo};
use crate::error::VockitError;

// ============================================================================
// COCO Schema Types (internal to this module)
// ============================================================================

#[derive(Debug, Serialize)]
struct CocoDataset<'a> {
    info: &'a DatasetInfo,
    licenses: [(); 0],
    images: Vec<CocoImage<'a>>,
    annotations: Vec<CocoAnnotation>,
    categories: Vec<CocoCategory<'a>>,
}

#[derive(Debug, Serialize)]
struct CocoImage<'a> {
    id: u64,
    file_name: &'a str,
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize)]
struct CocoAnnotation {
    id: u64,
    image_id: u64,
    category_id: u64,
    bbox: [u32; 4],
    area: f64,
    iscrowd: u8,
}

#[derive(Debug, Serialize)]
struct CocoCategory<'a> {
    id: u64,
    name: &'a str,
    supercategory: Option<&'a str>,
}

// ============================================================================
// Public API
// ============================================================================

/// Writes the document to `path`, creating parent directories as needed.
pub fn write_coco_json(path: &Path, document: &CocoDocument) -> Result<(), VockitError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &to_coco(document)).map_err(|source| {
        VockitError::CocoJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn to_coco(document: &CocoDocument) -> CocoDataset<'_> {
    let images = document
        .images
        .iter()
        .map(|img| CocoImage {
            id: img.id.as_u64(),
            file_name: &img.file_name,
            width: img.width,
            height: img.height,
        })
        .collect();

    let annotations = document
        .annotations
        .iter()
        .map(|ann| CocoAnnotation {
            id: ann.id.as_u64(),
            image_id: ann.image_id.as_u64(),
            category_id: ann.category_id.as_u64(),
            bbox: ann.bbox.to_xywh(),
            area: ann.area,
            iscrowd: u8::from(ann.is_crowd),
        })
        .collect();

    let categories = document
        .categories
        .iter()
        .map(|cat| CocoCategory {
            id: cat.id.as_u64(),
            name: &cat.name,
            supercategory: cat.supercategory.as_deref(),
        })
        .collect();

    CocoDataset {
        info: &document.info,
        licenses: [],
        images,
        annotations,
        categories,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::bbox::{normalize, RawBox};
    use crate::ir::model::{AnnotationEntry, ImageEntry};
    use crate::ir::{AnnotationId, CategoryId, ImageId, LabelMap};

    fn sample_document() -> CocoDocument {
        let bbox = normalize(RawBox::new(10, 10, 50, 50), 640, 480).expect("valid box");
        CocoDocument {
            info: DatasetInfo {
                description: Some("test".into()),
                ..Default::default()
            },
            images: vec![ImageEntry {
                id: ImageId::new(1),
                file_name: "000001.jpg".into(),
                width: 640,
                height: 480,
            }],
            annotations: vec![AnnotationEntry {
                id: AnnotationId::new(1),
                image_id: ImageId::new(1),
                category_id: CategoryId::new(1),
                bbox,
                area: bbox.area(),
                is_crowd: true,
            }],
            categories: LabelMap::default().categories(),
        }
    }

    #[test]
    fn serializes_coco_layout() {
        let document = sample_document();
        let value = serde_json::to_value(to_coco(&document)).expect("serialize");

        assert_eq!(value["licenses"], serde_json::json!([]));
        assert_eq!(value["info"]["description"], "test");
        assert!(value["info"]["year"].is_null());
        assert!(value["info"].get("date_created").is_some());

        assert_eq!(
            value["images"][0],
            serde_json::json!({"id": 1, "file_name": "000001.jpg", "width": 640, "height": 480})
        );
        assert_eq!(
            value["annotations"][0],
            serde_json::json!({
                "id": 1, "image_id": 1, "category_id": 1,
                "bbox": [10, 10, 40, 40], "area": 1600.0, "iscrowd": 1
            })
        );
        assert_eq!(
            value["categories"][1],
            serde_json::json!({"id": 2, "name": "motorbike", "supercategory": "vehicle"})
        );
    }

    #[test]
    fn write_creates_parent_directories() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("nested/out/coco.json");
        write_coco_json(&path, &sample_document()).expect("write coco");

        let text = fs::read_to_string(&path).expect("read back");
        assert!(text.starts_with("{\n  \"info\""));
        assert!(text.contains("\"area\": 1600.0"));
    }
}
