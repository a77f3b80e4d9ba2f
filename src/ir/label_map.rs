//! Fixed class-label table.
//!
//! Category ids come from an explicit lookup table, never from the order in
//! which labels happen to appear in a dataset, so the same label gets the
//! same id in every run.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::model::Category;
use super::CategoryId;
use crate::error::VockitError;

/// Normalizes free-text label input into its lookup key.
///
/// Strips all surrounding whitespace (including newlines) and lower-cases.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One row of the label table, also the CLI `NAME=ID[:SUPERCATEGORY]` form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassSpec {
    pub name: String,
    pub id: CategoryId,
    pub supercategory: Option<String>,
}

impl ClassSpec {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<CategoryId>,
        supercategory: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            supercategory: supercategory.map(ToOwned::to_owned),
        }
    }
}

impl FromStr for ClassSpec {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, rest) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=ID[:SUPERCATEGORY], got '{raw}'"))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(format!("empty class name in '{raw}'"));
        }

        let (id_raw, supercategory) = match rest.split_once(':') {
            Some((id, sup)) => (id, Some(sup.trim()).filter(|s| !s.is_empty())),
            None => (rest, None),
        };

        let id = id_raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| format!("invalid category id '{}' in '{raw}'", id_raw.trim()))?;

        Ok(ClassSpec::new(name, id, supercategory))
    }
}

/// Lookup table from normalized label text to category id.
#[derive(Clone, Debug)]
pub struct LabelMap {
    entries: Vec<ClassSpec>,
    by_key: BTreeMap<String, CategoryId>,
}

impl LabelMap {
    /// Builds a table from explicit entries.
    ///
    /// Names are compared after [`normalize_label`]; duplicate names or ids
    /// are rejected.
    pub fn from_entries(entries: Vec<ClassSpec>) -> Result<Self, VockitError> {
        if entries.is_empty() {
            return Err(VockitError::InvalidLabelMap(
                "at least one class is required".to_string(),
            ));
        }

        let mut by_key = BTreeMap::new();
        let mut seen_ids = BTreeMap::new();

        for entry in &entries {
            let key = normalize_label(&entry.name);
            if by_key.insert(key.clone(), entry.id).is_some() {
                return Err(VockitError::InvalidLabelMap(format!(
                    "duplicate class name '{key}'"
                )));
            }
            if let Some(previous) = seen_ids.insert(entry.id, key.clone()) {
                return Err(VockitError::InvalidLabelMap(format!(
                    "category id {} assigned to both '{previous}' and '{key}'",
                    entry.id
                )));
            }
        }

        let mut entries = entries;
        entries.sort_by_key(|entry| entry.id);

        Ok(Self { entries, by_key })
    }

    /// Looks up a raw label, or `None` if it is not in the table.
    pub fn resolve(&self, raw_label: &str) -> Option<CategoryId> {
        self.by_key.get(&normalize_label(raw_label)).copied()
    }

    /// The category table for the output document, ascending by id.
    pub fn categories(&self) -> Vec<Category> {
        self.entries
            .iter()
            .map(|entry| Category {
                id: entry.id,
                name: normalize_label(&entry.name),
                supercategory: entry.supercategory.clone(),
            })
            .collect()
    }
}

impl Default for LabelMap {
    /// The two-class vehicle table: `car` = 1, `motorbike` = 2.
    fn default() -> Self {
        let entries = vec![
            ClassSpec::new("car", 1, Some("vehicle")),
            ClassSpec::new("motorbike", 2, Some("vehicle")),
        ];
        let by_key = entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.id))
            .collect();
        Self { entries, by_key }
    }
}
