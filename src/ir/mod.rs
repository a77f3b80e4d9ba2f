//! Dataset model and format I/O for vockit.
//!
//! The input side is Pascal VOC: one XML document per image, extracted into
//! [`AnnotationDocument`]s by [`io_voc_xml`]. The output side is a single
//! COCO JSON document ([`CocoDocument`]) written by [`io_coco_json`].
//! Between them sit the [`LabelMap`] and the box [`normalize`]r.
//!
//! # Example
//!
//! ```
//! use vockit::ir::{normalize, LabelMap, RawBox};
//!
//! let labels = LabelMap::default();
//! assert_eq!(labels.resolve(" Motorbike\n").map(|id| id.as_u64()), Some(2));
//!
//! let bbox = normalize(RawBox::new(50, 50, 10, 10), 640, 480).unwrap();
//! assert_eq!(bbox.to_xywh(), [10, 10, 40, 40]);
//! ```

mod bbox;
mod ids;
pub mod images;
pub mod io_coco_json;
pub mod io_voc_xml;
mod label_map;
mod model;

pub use bbox::{normalize, DegenerateBox, NormalizedBox, RawBox};
pub use ids::{AnnotationId, CategoryId, ImageId};
pub use label_map::{normalize_label, ClassSpec, LabelMap};
pub use model::{
    AnnotationDocument, AnnotationEntry, Category, CocoDocument, DatasetInfo, ImageEntry,
    ObjectRecord, XmlField, UNKNOWN_LABEL,
};
