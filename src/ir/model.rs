//! Dataset model shared by the pairing, counting and conversion tools.
//!
//! The input side ([`AnnotationDocument`], [`ObjectRecord`]) is what the VOC
//! extractor produces from one XML file. The output side ([`CocoDocument`]
//! and its entries) is what the converter emits. All of it is transient and
//! rebuilt on every run.

use std::path::PathBuf;

use serde::Serialize;

use super::bbox::{NormalizedBox, RawBox};
use super::ids::{AnnotationId, CategoryId, ImageId};

/// Label used by the counter when an object has no `<name>` text.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// An optional XML field whose content may fail to parse.
///
/// Extraction records what it saw and leaves the failure policy to the
/// caller: the counter ignores these fields, the converter treats
/// `Malformed` as fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlField<T> {
    /// The element is not present.
    Absent,
    /// The element is present and parsed.
    Present(T),
    /// The element is present but its content is missing or invalid.
    Malformed(String),
}

/// One parsed VOC annotation file.
#[derive(Clone, Debug)]
pub struct AnnotationDocument {
    /// File name without extension; the join key to the image.
    pub stem: String,
    /// Path the document was read from.
    pub source: PathBuf,
    /// `(width, height)` from `<size>`.
    pub declared_size: XmlField<(u32, u32)>,
    /// `<object>` children in document order.
    pub objects: Vec<ObjectRecord>,
}

/// One `<object>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Trimmed `<name>` text, `None` when absent or empty.
    pub label: Option<String>,
    /// `<difficult>` parsed as an integer equal to 1.
    pub difficult: bool,
    pub bndbox: XmlField<RawBox>,
}

impl ObjectRecord {
    /// The label, or [`UNKNOWN_LABEL`] when the object has none.
    pub fn label_or_unknown(&self) -> &str {
        self.label.as_deref().unwrap_or(UNKNOWN_LABEL)
    }
}

/// Descriptive metadata for the COCO `info` block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub description: Option<String>,
    pub version: Option<String>,
    pub year: Option<u32>,
    pub contributor: Option<String>,
    pub url: Option<String>,
    pub date_created: Option<String>,
}

/// An image record in the output document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageEntry {
    pub id: ImageId,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// An annotation record in the output document.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationEntry {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,
    pub bbox: NormalizedBox,
    pub area: f64,
    /// Set from the VOC `difficult` flag.
    pub is_crowd: bool,
}

/// A category in the output document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub supercategory: Option<String>,
}

/// The complete result of a conversion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CocoDocument {
    pub info: DatasetInfo,
    pub images: Vec<ImageEntry>,
    pub annotations: Vec<AnnotationEntry>,
    pub categories: Vec<Category>,
}
