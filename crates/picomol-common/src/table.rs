//! Tabular data model for the prediction pipeline.
//!
//! Uploads arrive as one of two shapes:
//!   - a descriptor table (header row, identifier first, numeric cells), or
//!   - a raw molecule list (no header, identifier then SMILES).
//!
//! Row order is the upload order and is preserved through descriptor
//! selection; only the final ranking reorders anything.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PicomolError, Result};

/// One row of a descriptor table: identifier plus numeric descriptor values
/// aligned with the table header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorRow {
    pub id: String,
    pub values: Vec<f64>,
}

/// An ordered descriptor table. `columns[0]` is the identifier column;
/// `columns[1..]` name each row's `values` positionally. Identifiers need
/// not be unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorTable {
    pub columns: Vec<String>,
    pub rows: Vec<DescriptorRow>,
}

impl DescriptorTable {
    /// Index of a descriptor column into each row's `values`, by name.
    /// The identifier column is not addressable here.
    pub fn value_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().skip(1).position(|c| c == name)
    }

    /// Identifiers in row order.
    pub fn ids(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.id.clone()).collect()
    }

    /// (rows, columns) including the identifier column.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }
}

/// A raw molecule record: identifier plus SMILES structure notation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoleculeRecord {
    pub id: String,
    pub smiles: String,
}

/// Headerless molecule list, as uploaded for descriptor generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoleculeTable {
    pub records: Vec<MoleculeRecord>,
}

impl MoleculeTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The ordered descriptor subset the scoring model was trained on.
///
/// Defines both the required column set and the column order of the
/// feature matrix handed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureList {
    pub names: Vec<String>,
}

impl FeatureList {
    /// Load the required-descriptor list from its reference CSV. The file's
    /// single header row is the list, in scoring order.
    pub fn from_csv_header<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if names.is_empty() {
            return Err(PicomolError::MalformedTable(
                "descriptor list file has no header row".to_string(),
            ));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A descriptor table projected onto a [`FeatureList`]: fixed column order,
/// row count and row order identical to the source table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub ids: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// (rows, feature columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.feature_names.len())
    }
}

/// One scored compound: identifier paired with its predicted potency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub compound_id: String,
    pub pic50: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_table() -> DescriptorTable {
        DescriptorTable {
            columns: vec!["id".into(), "f1".into(), "f2".into()],
            rows: vec![
                DescriptorRow { id: "m1".into(), values: vec![1.0, 2.0] },
                DescriptorRow { id: "m2".into(), values: vec![4.0, 5.0] },
            ],
        }
    }

    #[test]
    fn test_value_index_skips_identifier_column() {
        let table = sample_table();
        assert_eq!(table.value_index("f1"), Some(0));
        assert_eq!(table.value_index("f2"), Some(1));
        assert_eq!(table.value_index("id"), None);
        assert_eq!(table.value_index("missing"), None);
    }

    #[test]
    fn test_shape_and_ids() {
        let table = sample_table();
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.ids(), vec!["m1".to_string(), "m2".to_string()]);
    }

    #[test]
    fn test_feature_list_from_csv_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PubchemFP0,PubchemFP1,PubchemFP2").unwrap();
        writeln!(file, "0,1,0").unwrap();

        let list = FeatureList::from_csv_header(file.path()).unwrap();
        assert_eq!(
            list.names,
            vec!["PubchemFP0".to_string(), "PubchemFP1".to_string(), "PubchemFP2".to_string()]
        );
    }
}
