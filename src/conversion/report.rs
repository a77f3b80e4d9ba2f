//! Conversion report types.
//!
//! Every recoverable condition met during a conversion is recorded here as
//! a counter plus an issue entry, so the final summary can account for
//! everything that was skipped.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Summary of one VOC to COCO conversion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Image entries written to the output.
    pub images_written: usize,
    /// Annotation entries written to the output.
    pub annotations_written: usize,
    /// Objects skipped because their label is not in the table.
    pub unknown_labels_skipped: usize,
    /// Documents skipped because no image file was found.
    pub missing_images_skipped: usize,
    /// Objects skipped because they have no `<bndbox>`.
    pub missing_bndbox_skipped: usize,
    /// Objects skipped because their box has no area after clipping.
    pub degenerate_boxes_skipped: usize,
    /// Where the document was written, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// One entry per skipped document or object.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a skipped item: bumps the matching counter, logs a warning
    /// and keeps the issue.
    pub fn skip(&mut self, code: ConversionIssueCode, file: &Path, message: impl Into<String>) {
        let counter = match code {
            ConversionIssueCode::UnknownLabel => &mut self.unknown_labels_skipped,
            ConversionIssueCode::MissingImage => &mut self.missing_images_skipped,
            ConversionIssueCode::MissingBndbox => &mut self.missing_bndbox_skipped,
            ConversionIssueCode::DegenerateBox => &mut self.degenerate_boxes_skipped,
        };
        *counter += 1;

        let issue = ConversionIssue {
            code,
            file: file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string()),
            message: message.into(),
        };
        tracing::warn!("[WARN] {}", issue);
        self.issues.push(issue);
    }

    /// Total number of skipped documents and objects.
    pub fn skipped_count(&self) -> usize {
        self.issues.len()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== VOC XML -> COCO JSON Conversion Complete ===")?;
        writeln!(f, "Images written          : {}", self.images_written)?;
        writeln!(f, "Annotations written     : {}", self.annotations_written)?;
        writeln!(f, "Unknown labels skipped  : {}", self.unknown_labels_skipped)?;
        writeln!(f, "Missing images skipped  : {}", self.missing_images_skipped)?;
        writeln!(f, "Missing bndbox skipped  : {}", self.missing_bndbox_skipped)?;
        writeln!(f, "Degenerate boxes skipped: {}", self.degenerate_boxes_skipped)?;
        writeln!(f, "Total skipped           : {}", self.skipped_count())?;
        if let Some(output) = &self.output {
            writeln!(f, "Output                  : {}", output.display())?;
        }
        Ok(())
    }
}

/// A single skipped document or object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversionIssue {
    pub code: ConversionIssueCode,
    /// Annotation file name the issue came from.
    pub file: String,
    pub message: String,
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// Object label not in the table (only with unknown labels allowed).
    UnknownLabel,
    /// No image file matches the annotation stem; the document is skipped.
    MissingImage,
    /// Object has no `<bndbox>`.
    MissingBndbox,
    /// Box has zero width or height after clipping.
    DegenerateBox,
}
