use std::path::PathBuf;
use thiserror::Error;

use crate::pairing::PairingReport;

/// The main error type for vockit operations.
#[derive(Debug, Error)]
pub enum VockitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} directory not found: {}", path.display())]
    MissingDirectory { kind: &'static str, path: PathBuf },

    #[error("No XML files found in: {}", path.display())]
    NoAnnotationFiles { path: PathBuf },

    #[error("Failed to parse VOC XML {}: {message}", path.display())]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Unknown class label '{label}' in {}", path.display())]
    UnknownLabel { path: PathBuf, label: String },

    #[error(
        "Missing <size> in {} and unable to read dimensions of {}: {message}",
        xml.display(),
        image.display()
    )]
    MissingImageDimensions {
        xml: PathBuf,
        image: PathBuf,
        message: String,
    },

    #[error("Failed to read image dimensions from {}: {source}", path.display())]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Invalid label map: {0}")]
    InvalidLabelMap(String),

    #[error("Failed to write COCO JSON to {}: {source}", path.display())]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report: {source}")]
    ReportSerialize {
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Dataset pairing is inconsistent: {} image(s) without XML, {} XML file(s) without image",
        report.missing_annotation.len(),
        report.missing_image.len()
    )]
    PairingMismatch { report: PairingReport },
}

impl VockitError {
    /// Process exit status for this error.
    ///
    /// Configuration problems exit with 2, malformed XML with 3, and every
    /// other failure (including pairing mismatches) with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            VockitError::MissingDirectory { .. } | VockitError::NoAnnotationFiles { .. } => 2,
            VockitError::VocXmlParse { .. } => 3,
            _ => 1,
        }
    }
}
