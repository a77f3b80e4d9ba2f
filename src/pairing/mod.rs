//! Image/annotation pairing check.
//!
//! Images and annotation files are joined on their file stem. Every image
//! should have exactly one XML file and every XML file an image.

mod report;

pub use report::{format_preview, PairingReport, DEFAULT_PREVIEW_LIMIT};

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::VockitError;
use crate::ir::images::{list_annotation_stems, list_image_stems};

/// Compares the two stem sets.
///
/// `missing_annotation` is `images - annotations` and `missing_image` is
/// `annotations - images`, both sorted.
pub fn check_pairs(
    image_stems: &BTreeSet<String>,
    annotation_stems: &BTreeSet<String>,
) -> PairingReport {
    PairingReport {
        images_found: image_stems.len(),
        annotations_found: annotation_stems.len(),
        paired: image_stems.intersection(annotation_stems).count(),
        missing_annotation: image_stems
            .difference(annotation_stems)
            .cloned()
            .collect(),
        missing_image: annotation_stems.difference(image_stems).cloned().collect(),
        preview_limit: DEFAULT_PREVIEW_LIMIT,
    }
}

/// Lists both directories (non-recursively) and compares their stems.
pub fn check_dataset_pairs(
    images_dir: &Path,
    annotations_dir: &Path,
) -> Result<PairingReport, VockitError> {
    require_dir("Images", images_dir)?;
    require_dir("Annotations", annotations_dir)?;

    let image_stems = list_image_stems(images_dir)?;
    let annotation_stems = list_annotation_stems(annotations_dir)?;

    tracing::debug!(
        images = image_stems.len(),
        annotations = annotation_stems.len(),
        "listed dataset stems"
    );

    Ok(check_pairs(&image_stems, &annotation_stems))
}

pub(crate) fn require_dir(kind: &'static str, path: &Path) -> Result<(), VockitError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(VockitError::MissingDirectory {
            kind,
            path: path.to_path_buf(),
        })
    }
}
