//! VOC XML to COCO JSON conversion.
//!
//! Annotation files are processed in lexicographic file-name order. Each
//! one is resolved to its image, given the next image id, and its objects
//! are mapped, normalized and numbered with a run-wide annotation id.
//!
//! The conversion is all-or-nothing for structural problems (malformed XML,
//! unknown dimensions, unknown labels unless allowed), while per-document
//! and per-object defects are skipped and recorded in the
//! [`ConversionReport`].

mod report;

pub use report::{ConversionIssue, ConversionIssueCode, ConversionReport};

use std::path::{Path, PathBuf};

use crate::error::VockitError;
use crate::ir::images::{read_image_dimensions, resolve_image};
use crate::ir::io_coco_json::write_coco_json;
use crate::ir::io_voc_xml::{collect_xml_files, walk_documents, ParseFailurePolicy};
use crate::ir::{
    normalize, AnnotationDocument, AnnotationEntry, AnnotationId, CocoDocument, DatasetInfo,
    ImageEntry, ImageId, LabelMap, XmlField,
};
use crate::pairing::require_dir;

/// Options for a conversion run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub images_dir: PathBuf,
    pub annotations_dir: PathBuf,
    /// Skip objects with labels outside the table instead of failing.
    pub allow_unknown_labels: bool,
    pub label_map: LabelMap,
    /// Metadata for the COCO `info` block.
    pub info: DatasetInfo,
}

impl ConvertOptions {
    /// Options with the default label table and empty metadata.
    pub fn new(images_dir: impl Into<PathBuf>, annotations_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            annotations_dir: annotations_dir.into(),
            allow_unknown_labels: false,
            label_map: LabelMap::default(),
            info: DatasetInfo::default(),
        }
    }

    pub fn allow_unknown_labels(mut self, allow: bool) -> Self {
        self.allow_unknown_labels = allow;
        self
    }

    pub fn with_label_map(mut self, label_map: LabelMap) -> Self {
        self.label_map = label_map;
        self
    }

    pub fn with_info(mut self, info: DatasetInfo) -> Self {
        self.info = info;
        self
    }
}

/// A finished conversion.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub document: CocoDocument,
    pub report: ConversionReport,
}

/// Converts the annotation directory into a COCO document.
pub fn convert(opts: &ConvertOptions) -> Result<Conversion, VockitError> {
    require_dir("Images", &opts.images_dir)?;
    require_dir("Annotations", &opts.annotations_dir)?;

    let xml_files = collect_xml_files(&opts.annotations_dir, false)?;
    if xml_files.is_empty() {
        return Err(VockitError::NoAnnotationFiles {
            path: opts.annotations_dir.clone(),
        });
    }

    tracing::info!(
        files = xml_files.len(),
        images_dir = %opts.images_dir.display(),
        "converting VOC XML to COCO JSON"
    );

    let mut ctx = ConversionContext::new(opts);
    walk_documents(&xml_files, ParseFailurePolicy::Abort, |document| {
        ctx.process_document(document)
    })?;

    Ok(ctx.finish())
}

/// Runs [`convert`] and writes the result to `output`.
pub fn convert_to_file(opts: &ConvertOptions, output: &Path) -> Result<Conversion, VockitError> {
    let mut conversion = convert(opts)?;
    write_coco_json(output, &conversion.document)?;
    conversion.report.output = Some(output.to_path_buf());
    Ok(conversion)
}

/// Accumulator threaded through every document of a run.
struct ConversionContext<'a> {
    opts: &'a ConvertOptions,
    next_image_id: ImageId,
    next_annotation_id: AnnotationId,
    images: Vec<ImageEntry>,
    annotations: Vec<AnnotationEntry>,
    report: ConversionReport,
}

impl<'a> ConversionContext<'a> {
    fn new(opts: &'a ConvertOptions) -> Self {
        Self {
            opts,
            next_image_id: ImageId::new(1),
            next_annotation_id: AnnotationId::new(1),
            images: Vec::new(),
            annotations: Vec::new(),
            report: ConversionReport::new(),
        }
    }

    fn process_document(&mut self, document: AnnotationDocument) -> Result<(), VockitError> {
        let xml_path = &document.source;

        let Some(image_path) = resolve_image(&self.opts.images_dir, &document.stem)? else {
            self.report.skip(
                ConversionIssueCode::MissingImage,
                xml_path,
                "Missing image for XML",
            );
            return Ok(());
        };

        let (width, height) = match &document.declared_size {
            XmlField::Present(size) => *size,
            XmlField::Malformed(message) => {
                return Err(VockitError::VocXmlParse {
                    path: xml_path.clone(),
                    message: message.clone(),
                })
            }
            XmlField::Absent => read_image_dimensions(&image_path).map_err(|err| {
                VockitError::MissingImageDimensions {
                    xml: xml_path.clone(),
                    image: image_path.clone(),
                    message: err.to_string(),
                }
            })?,
        };

        let image_id = self.next_image_id;
        self.next_image_id = image_id.next();
        self.images.push(ImageEntry {
            id: image_id,
            file_name: image_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            width,
            height,
        });

        for object in &document.objects {
            let raw_label = object.label.as_deref().unwrap_or("");
            let Some(category_id) = self.opts.label_map.resolve(raw_label) else {
                if !self.opts.allow_unknown_labels {
                    return Err(VockitError::UnknownLabel {
                        path: xml_path.clone(),
                        label: raw_label.to_string(),
                    });
                }
                self.report.skip(
                    ConversionIssueCode::UnknownLabel,
                    xml_path,
                    format!("Unknown class label '{raw_label}' -> skipped"),
                );
                continue;
            };

            let raw = match &object.bndbox {
                XmlField::Present(raw) => *raw,
                XmlField::Absent => {
                    self.report.skip(
                        ConversionIssueCode::MissingBndbox,
                        xml_path,
                        "Missing bndbox; object skipped",
                    );
                    continue;
                }
                XmlField::Malformed(message) => {
                    return Err(VockitError::VocXmlParse {
                        path: xml_path.clone(),
                        message: message.clone(),
                    })
                }
            };

            let bbox = match normalize(raw, width, height) {
                Ok(bbox) => bbox,
                Err(degenerate) => {
                    self.report.skip(
                        ConversionIssueCode::DegenerateBox,
                        xml_path,
                        format!("Invalid box {degenerate} -> skipped"),
                    );
                    continue;
                }
            };

            let annotation_id = self.next_annotation_id;
            self.next_annotation_id = annotation_id.next();
            self.annotations.push(AnnotationEntry {
                id: annotation_id,
                image_id,
                category_id,
                bbox,
                area: bbox.area(),
                is_crowd: object.difficult,
            });
        }

        Ok(())
    }

    fn finish(self) -> Conversion {
        let mut report = self.report;
        report.images_written = self.images.len();
        report.annotations_written = self.annotations.len();

        Conversion {
            document: CocoDocument {
                info: self.opts.info.clone(),
                images: self.images,
                annotations: self.annotations,
                categories: self.opts.label_map.categories(),
            },
            report,
        }
    }
}
