//! Pairing report types and terminal formatting.

use serde::Serialize;
use std::fmt;

/// Default number of unmatched stems shown per side.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// Result of matching image stems against annotation stems.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PairingReport {
    /// Number of distinct image stems.
    pub images_found: usize,
    /// Number of distinct annotation stems.
    pub annotations_found: usize,
    /// Stems present on both sides.
    pub paired: usize,
    /// Image stems with no annotation, sorted.
    pub missing_annotation: Vec<String>,
    /// Annotation stems with no image, sorted.
    pub missing_image: Vec<String>,
    /// How many stems to list per side in the text rendering.
    #[serde(skip)]
    pub preview_limit: usize,
}

impl PairingReport {
    /// True when every image has an annotation and vice versa.
    pub fn is_consistent(&self) -> bool {
        self.missing_annotation.is_empty() && self.missing_image.is_empty()
    }

    /// Sets the number of stems listed per side.
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }
}

/// Joins sorted stems for display, truncating to `limit` entries.
///
/// Returns `"(none)"` for an empty list and appends `" ... (+N more)"` when
/// entries were dropped.
pub fn format_preview(items: &[String], limit: usize) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }

    let shown = items.len().min(limit);
    let mut out = items[..shown].join(", ");
    if items.len() > limit {
        out.push_str(&format!(" ... (+{} more)", items.len() - limit));
    }
    out
}

impl fmt::Display for PairingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Dataset Pair Check ===")?;
        writeln!(f, "Images found         : {}", self.images_found)?;
        writeln!(f, "XML annotations found: {}", self.annotations_found)?;
        writeln!(f, "Paired files         : {}", self.paired)?;
        writeln!(f)?;

        if self.missing_annotation.is_empty() {
            writeln!(f, "[OK] Every image has a matching XML annotation.")?;
        } else {
            writeln!(
                f,
                "[WARN] Images without XML ({}):",
                self.missing_annotation.len()
            )?;
            writeln!(
                f,
                "       {}",
                format_preview(&self.missing_annotation, self.preview_limit)
            )?;
        }

        if self.missing_image.is_empty() {
            writeln!(f, "[OK] Every XML has a matching image file.")?;
        } else {
            writeln!(
                f,
                "[WARN] XML files without image ({}):",
                self.missing_image.len()
            )?;
            writeln!(
                f,
                "       {}",
                format_preview(&self.missing_image, self.preview_limit)
            )?;
        }

        writeln!(f)?;
        if self.is_consistent() {
            writeln!(f, "[SUCCESS] Dataset pairing looks consistent.")
        } else {
            writeln!(f, "[CHECK REQUIRED] Please fix missing pairs.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stems(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{i:03}")).collect()
    }

    #[test]
    fn preview_of_empty_list_is_none() {
        assert_eq!(format_preview(&[], 10), "(none)");
    }

    #[test]
    fn preview_within_limit_lists_everything() {
        assert_eq!(format_preview(&stems(3), 10), "000, 001, 002");
        assert_eq!(format_preview(&stems(10), 10).matches(", ").count(), 9);
    }

    #[test]
    fn preview_over_limit_appends_remainder() {
        assert_eq!(
            format_preview(&stems(13), 10),
            "000, 001, 002, 003, 004, 005, 006, 007, 008, 009 ... (+3 more)"
        );
        assert_eq!(format_preview(&stems(2), 1), "000 ... (+1 more)");
    }

    #[test]
    fn report_text_reflects_status() {
        let report = PairingReport {
            images_found: 2,
            annotations_found: 1,
            paired: 1,
            missing_annotation: vec!["b".into()],
            missing_image: vec![],
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        };
        let text = report.to_string();
        assert!(text.contains("[WARN] Images without XML (1):"));
        assert!(text.contains("       b\n"));
        assert!(text.contains("[OK] Every XML has a matching image file."));
        assert!(text.contains("[CHECK REQUIRED]"));
    }
}
