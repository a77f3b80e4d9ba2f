//! Pascal VOC XML extraction.
//!
//! Each annotation file becomes one [`AnnotationDocument`]. Extraction is
//! lenient about content (numeric fields are recorded as malformed rather
//! than rejected) and strict only about XML well-formedness, which is the
//! one failure every caller has to handle.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use walkdir::WalkDir;

use super::bbox::RawBox;
use super::model::{AnnotationDocument, ObjectRecord, XmlField};
use crate::error::VockitError;

const VOC_XML_EXTENSION: &str = "xml";

/// What to do when a document is not well-formed XML.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseFailurePolicy {
    /// Stop the walk and return the error.
    Abort,
    /// Log a warning, count the failure and continue with the next file.
    Record,
}

/// Totals from [`walk_documents`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    pub parsed: usize,
    pub failed: usize,
}

/// Parses each file in order and hands the document to `visit`.
///
/// Parse failures follow `policy`. Errors returned by `visit` always stop
/// the walk.
pub fn walk_documents<F>(
    xml_files: &[PathBuf],
    policy: ParseFailurePolicy,
    mut visit: F,
) -> Result<WalkOutcome, VockitError>
where
    F: FnMut(AnnotationDocument) -> Result<(), VockitError>,
{
    let mut outcome = WalkOutcome::default();

    for xml_path in xml_files {
        let document = match parse_voc_xml(xml_path) {
            Ok(document) => document,
            Err(err) if policy == ParseFailurePolicy::Record => {
                tracing::warn!("[PARSE ERROR] {}: {}", display_name(xml_path), err);
                outcome.failed += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        tracing::debug!(
            file = %xml_path.display(),
            objects = document.objects.len(),
            "parsed annotation document"
        );
        outcome.parsed += 1;
        visit(document)?;
    }

    Ok(outcome)
}

/// Lists `.xml` files (extension matched case-insensitively).
///
/// Flat mode returns direct children sorted by file name. Recursive mode
/// walks the whole tree and sorts by path relative to `dir`.
pub fn collect_xml_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, VockitError> {
    let mut files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|source| {
                VockitError::Io(std::io::Error::other(format!(
                    "failed while traversing {}: {source}",
                    dir.display()
                )))
            })?;
            if entry.file_type().is_file() && has_xml_extension(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort_by_cached_key(|path| rel_string(dir, path));
    } else {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_xml_extension(&path) {
                files.push(path);
            }
        }
        files.sort_by_cached_key(|path| display_name(path));
    }

    Ok(files)
}

/// Reads and extracts one annotation file.
pub fn parse_voc_xml(path: &Path) -> Result<AnnotationDocument, VockitError> {
    let bytes = fs::read(path)?;
    let xml = std::str::from_utf8(&bytes).map_err(|source| VockitError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_voc_xml_str(xml, path)
}

/// Extracts a document from XML text. `path` supplies the stem and is used
/// in error messages; it is not read.
pub fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<AnnotationDocument, VockitError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let document = roxmltree::Document::parse_with_options(xml, options).map_err(|source| {
        VockitError::VocXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        }
    })?;

    let root = document.root_element();

    let declared_size = match child_element(root, "size") {
        None => XmlField::Absent,
        Some(size) => match (
            parse_dimension(size, "width"),
            parse_dimension(size, "height"),
        ) {
            (Ok(width), Ok(height)) => XmlField::Present((width, height)),
            (Err(message), _) | (_, Err(message)) => XmlField::Malformed(message),
        },
    };

    let objects = root
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
        .map(extract_object)
        .collect();

    Ok(AnnotationDocument {
        stem: path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
        source: path.to_path_buf(),
        declared_size,
        objects,
    })
}

/// Parse VOC XML from bytes.
///
/// The input must be valid UTF-8. Primarily useful for fuzzing.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<AnnotationDocument, VockitError> {
    let memory = Path::new("<memory>");
    let xml = std::str::from_utf8(bytes).map_err(|source| VockitError::VocXmlParse {
        path: memory.to_path_buf(),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_voc_xml_str(xml, memory)
}

fn extract_object(object: Node<'_, '_>) -> ObjectRecord {
    let label = child_text(object, "name").map(ToOwned::to_owned);

    let difficult = child_text(object, "difficult")
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(0)
        == 1;

    let bndbox = match child_element(object, "bndbox") {
        None => XmlField::Absent,
        Some(node) => match extract_box(node) {
            Ok(raw) => XmlField::Present(raw),
            Err(message) => XmlField::Malformed(message),
        },
    };

    ObjectRecord {
        label,
        difficult,
        bndbox,
    }
}

fn extract_box(bndbox: Node<'_, '_>) -> Result<RawBox, String> {
    Ok(RawBox::new(
        parse_coordinate(bndbox, "xmin")?,
        parse_coordinate(bndbox, "ymin")?,
        parse_coordinate(bndbox, "xmax")?,
        parse_coordinate(bndbox, "ymax")?,
    ))
}

/// Parses a coordinate as a float and truncates toward zero, so `"123.0"`
/// and `"12.7"` are accepted.
fn parse_coordinate(node: Node<'_, '_>, tag: &str) -> Result<i64, String> {
    let raw = child_text(node, tag).ok_or_else(|| format!("missing <{tag}> in <bndbox>"))?;
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("invalid <{tag}> value '{raw}' in <bndbox>; expected a number"))?;
    Ok(value.trunc() as i64)
}

fn parse_dimension(node: Node<'_, '_>, tag: &str) -> Result<u32, String> {
    let raw = child_text(node, tag).ok_or_else(|| format!("missing <{tag}> in <size>"))?;
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0 && *value <= u32::MAX as f64)
        .map(|value| value.trunc() as u32)
        .ok_or_else(|| format!("invalid <{tag}> value '{raw}' in <size>; expected u32"))
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(VOC_XML_EXTENSION))
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
