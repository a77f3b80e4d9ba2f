//! Per-class instance counting over VOC annotation files.
//!
//! Counting is resilient: a document that fails to parse is logged and
//! counted, and the run continues with the next file.

mod report;

pub use report::{ClassCount, CountingReport};

use std::collections::HashMap;
use std::path::Path;

use crate::error::VockitError;
use crate::ir::io_voc_xml::{collect_xml_files, walk_documents, ParseFailurePolicy};
use crate::ir::AnnotationDocument;
use crate::pairing::require_dir;

/// Options for instance counting.
#[derive(Clone, Debug, Default)]
pub struct CountOptions {
    /// Search for XML files in subdirectories too.
    pub recursive: bool,
    /// Leave difficult instances out of the class table.
    pub exclude_difficult: bool,
}

/// Counts instances in every XML file under `annotations_dir`.
pub fn count_instances(
    annotations_dir: &Path,
    opts: &CountOptions,
) -> Result<CountingReport, VockitError> {
    require_dir("Annotations", annotations_dir)?;

    let xml_files = collect_xml_files(annotations_dir, opts.recursive)?;
    if xml_files.is_empty() {
        return Err(VockitError::NoAnnotationFiles {
            path: annotations_dir.to_path_buf(),
        });
    }

    tracing::info!(files = xml_files.len(), "counting instances");

    let mut tally = InstanceTally::new(opts.exclude_difficult);
    let outcome = walk_documents(&xml_files, ParseFailurePolicy::Record, |document| {
        tally.record_document(&document);
        Ok(())
    })?;

    tally.record_parse_errors(outcome.failed);

    Ok(tally.finish(xml_files.len()))
}

/// Running counts for [`count_instances`].
#[derive(Clone, Debug, Default)]
pub struct InstanceTally {
    exclude_difficult: bool,
    report: CountingReport,
    /// Label -> index into `report.classes`.
    class_index: HashMap<String, usize>,
}

impl InstanceTally {
    pub fn new(exclude_difficult: bool) -> Self {
        Self {
            exclude_difficult,
            report: CountingReport::default(),
            class_index: HashMap::new(),
        }
    }

    /// Adds one parsed document.
    pub fn record_document(&mut self, document: &AnnotationDocument) {
        self.report.total_images += 1;

        if document.objects.is_empty() {
            self.report.empty_images += 1;
            return;
        }

        for object in &document.objects {
            if object.difficult {
                self.report.difficult_instances += 1;
                if self.exclude_difficult {
                    continue;
                }
            }

            self.report.total_instances += 1;
            let label = object.label_or_unknown();
            match self.class_index.get(label) {
                Some(&index) => self.report.classes[index].count += 1,
                None => {
                    self.class_index
                        .insert(label.to_string(), self.report.classes.len());
                    self.report.classes.push(ClassCount {
                        label: label.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    /// Adds documents that failed to parse.
    pub fn record_parse_errors(&mut self, count: usize) {
        self.report.parse_errors += count;
    }

    /// Finalizes the report, sorting classes by descending count.
    pub fn finish(mut self, xml_files: usize) -> CountingReport {
        self.report.xml_files = xml_files;
        // Stable sort keeps discovery order for equal counts.
        self.report
            .classes
            .sort_by(|left, right| right.count.cmp(&left.count));
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ObjectRecord, XmlField};
    use std::path::PathBuf;

    fn object(label: Option<&str>, difficult: bool) -> ObjectRecord {
        ObjectRecord {
            label: label.map(ToOwned::to_owned),
            difficult,
            bndbox: XmlField::Absent,
        }
    }

    fn document(objects: Vec<ObjectRecord>) -> AnnotationDocument {
        AnnotationDocument {
            stem: "doc".into(),
            source: PathBuf::from("doc.xml"),
            declared_size: XmlField::Absent,
            objects,
        }
    }

    #[test]
    fn classes_sort_by_count_with_stable_ties() {
        let mut tally = InstanceTally::new(false);
        tally.record_document(&document(vec![
            object(Some("bus"), false),
            object(Some("car"), false),
            object(Some("truck"), false),
            object(Some("truck"), false),
        ]));
        let report = tally.finish(1);

        let order: Vec<&str> = report.classes.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(order, vec!["truck", "bus", "car"]);
        assert_eq!(report.total_instances, 4);
    }

    #[test]
    fn difficult_instances_are_always_counted_but_optionally_excluded() {
        let objects = vec![object(Some("car"), true), object(Some("car"), false)];

        let mut keep = InstanceTally::new(false);
        keep.record_document(&document(objects.clone()));
        let keep = keep.finish(1);
        assert_eq!(keep.difficult_instances, 1);
        assert_eq!(keep.total_instances, 2);
        assert_eq!(keep.count_for("car"), 2);

        let mut exclude = InstanceTally::new(true);
        exclude.record_document(&document(objects));
        let exclude = exclude.finish(1);
        assert_eq!(exclude.difficult_instances, 1);
        assert_eq!(exclude.total_instances, 1);
        assert_eq!(exclude.count_for("car"), 1);
    }

    #[test]
    fn empty_documents_and_missing_labels() {
        let mut tally = InstanceTally::new(false);
        tally.record_document(&document(vec![]));
        tally.record_document(&document(vec![object(None, false)]));
        tally.record_parse_errors(1);
        let report = tally.finish(3);

        assert_eq!(report.xml_files, 3);
        assert_eq!(report.total_images, 2);
        assert_eq!(report.empty_images, 1);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(report.count_for("UNKNOWN"), 1);
    }

    #[test]
    fn counts_accumulate_across_documents_in_discovery_order() {
        let mut tally = InstanceTally::new(false);
        tally.record_document(&document(vec![
            object(Some("car"), false),
            object(Some("bus"), false),
        ]));
        tally.record_document(&document(vec![
            object(Some("bus"), false),
            object(Some("car"), false),
            object(Some("van"), false),
        ]));
        let report = tally.finish(2);

        let classes: Vec<(&str, usize)> = report
            .classes
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect();
        assert_eq!(classes, vec![("car", 2), ("bus", 2), ("van", 1)]);
    }
}
