//! Projection of a descriptor table onto the model's feature subset.

use tracing::debug;

use picomol_common::error::{PicomolError, Result};
use picomol_common::table::{DescriptorTable, FeatureList, FeatureMatrix};

/// Project `table` onto the columns named by `required`, in the required
/// order.
///
/// Fails with `MissingRequiredFeature` on the first required name absent
/// from the table header. Row order and identifier association mirror the
/// input exactly; no reordering happens here.
pub fn select_features(table: &DescriptorTable, required: &FeatureList) -> Result<FeatureMatrix> {
    let mut indices = Vec::with_capacity(required.len());
    for name in &required.names {
        match table.value_index(name) {
            Some(index) => indices.push(index),
            None => return Err(PicomolError::MissingRequiredFeature(name.clone())),
        }
    }

    let rows: Vec<Vec<f64>> = table
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row.values[i]).collect())
        .collect();

    debug!(
        rows = rows.len(),
        features = indices.len(),
        "Selected descriptor subset"
    );

    Ok(FeatureMatrix {
        feature_names: required.names.clone(),
        ids: table.ids(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use picomol_common::table::DescriptorRow;

    fn table() -> DescriptorTable {
        DescriptorTable {
            columns: vec!["id".into(), "f1".into(), "f2".into(), "f3".into()],
            rows: vec![
                DescriptorRow { id: "m1".into(), values: vec![1.0, 2.0, 3.0] },
                DescriptorRow { id: "m2".into(), values: vec![4.0, 5.0, 6.0] },
            ],
        }
    }

    #[test]
    fn test_selection_reorders_columns_not_rows() {
        let required = FeatureList { names: vec!["f2".into(), "f1".into()] };
        let matrix = select_features(&table(), &required).unwrap();

        assert_eq!(matrix.feature_names, vec!["f2", "f1"]);
        assert_eq!(matrix.ids, vec!["m1", "m2"]);
        assert_eq!(matrix.rows, vec![vec![2.0, 1.0], vec![5.0, 4.0]]);
    }

    #[test]
    fn test_row_count_matches_input() {
        let required = FeatureList { names: vec!["f1".into(), "f2".into(), "f3".into()] };
        let matrix = select_features(&table(), &required).unwrap();
        assert_eq!(matrix.shape(), (2, 3));
    }

    #[test]
    fn test_missing_feature_short_circuits() {
        let required = FeatureList { names: vec!["f1".into(), "f9".into()] };
        let err = select_features(&table(), &required).unwrap_err();
        assert!(matches!(err, PicomolError::MissingRequiredFeature(name) if name == "f9"));
    }

    #[test]
    fn test_identifier_column_is_not_selectable() {
        let required = FeatureList { names: vec!["id".into()] };
        let err = select_features(&table(), &required).unwrap_err();
        assert!(matches!(err, PicomolError::MissingRequiredFeature(_)));
    }
}
