//! Instance count report types and terminal formatting.

use serde::Serialize;
use std::fmt;

/// Per-class instance count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    pub label: String,
    pub count: usize,
}

/// The result of counting instances across annotation files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CountingReport {
    /// XML files discovered.
    pub xml_files: usize,
    /// Documents that parsed successfully.
    pub total_images: usize,
    /// Parsed documents without any `<object>`.
    pub empty_images: usize,
    /// Instances counted toward the class table.
    pub total_instances: usize,
    /// Difficult instances seen, whether or not they were excluded.
    pub difficult_instances: usize,
    /// Documents that failed to parse.
    pub parse_errors: usize,
    /// Class counts, descending by count; ties keep discovery order.
    pub classes: Vec<ClassCount>,
}

impl CountingReport {
    /// Count for a class label, or 0 if it never appeared.
    pub fn count_for(&self, label: &str) -> usize {
        self.classes
            .iter()
            .find(|class| class.label == label)
            .map_or(0, |class| class.count)
    }
}

impl fmt::Display for CountingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== SUMMARY =====")?;
        writeln!(f, "XML files (images)        : {}", self.xml_files)?;
        writeln!(f, "Parsed images             : {}", self.total_images)?;
        writeln!(f, "Images with 0 objects     : {}", self.empty_images)?;
        writeln!(f, "Total instances (objects) : {}", self.total_instances)?;
        writeln!(f, "Difficult instances (all) : {}", self.difficult_instances)?;
        writeln!(f, "Parse errors              : {}", self.parse_errors)?;
        writeln!(f)?;
        writeln!(f, "===== INSTANCES PER CLASS =====")?;
        for class in &self.classes {
            writeln!(f, "{:<20} {}", class.label, class.count)?;
        }
        Ok(())
    }
}
