#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A minimal 24-bit BMP whose header carries the given dimensions.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Writes a placeholder image file; only its name matters.
pub fn touch_image(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, b"not really an image").expect("write image placeholder");
}

/// One `<object>` for [`voc_xml`].
pub struct Obj<'a> {
    pub name: &'a str,
    pub difficult: u8,
    pub bndbox: Option<(i64, i64, i64, i64)>,
}

impl<'a> Obj<'a> {
    pub fn new(name: &'a str, bndbox: (i64, i64, i64, i64)) -> Self {
        Self {
            name,
            difficult: 0,
            bndbox: Some(bndbox),
        }
    }

    pub fn difficult(mut self) -> Self {
        self.difficult = 1;
        self
    }
}

/// Renders a VOC annotation. `size` of `None` omits the `<size>` block.
pub fn voc_xml(size: Option<(u32, u32)>, objects: &[Obj<'_>]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<annotation>\n");
    if let Some((width, height)) = size {
        xml.push_str(&format!(
            "  <size>\n    <width>{width}</width>\n    <height>{height}</height>\n    <depth>3</depth>\n  </size>\n"
        ));
    }
    for obj in objects {
        xml.push_str("  <object>\n");
        xml.push_str(&format!("    <name>{}</name>\n", obj.name));
        xml.push_str(&format!("    <difficult>{}</difficult>\n", obj.difficult));
        if let Some((xmin, ymin, xmax, ymax)) = obj.bndbox {
            xml.push_str(&format!(
                "    <bndbox>\n      <xmin>{xmin}</xmin>\n      <ymin>{ymin}</ymin>\n      <xmax>{xmax}</xmax>\n      <ymax>{ymax}</ymax>\n    </bndbox>\n"
            ));
        }
        xml.push_str("  </object>\n");
    }
    xml.push_str("</annotation>\n");
    xml
}

/// A dataset with `images/` and `annotations/` under a temp root.
pub struct Dataset {
    pub root: tempfile::TempDir,
}

impl Dataset {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(root.path().join("images")).expect("create images dir");
        fs::create_dir_all(root.path().join("annotations")).expect("create annotations dir");
        Self { root }
    }

    pub fn images(&self) -> PathBuf {
        self.root.path().join("images")
    }

    pub fn annotations(&self) -> PathBuf {
        self.root.path().join("annotations")
    }

    pub fn add_xml(&self, file_name: &str, xml: &str) {
        fs::write(self.annotations().join(file_name), xml).expect("write xml");
    }

    pub fn add_image(&self, file_name: &str) {
        touch_image(&self.images().join(file_name));
    }
}
