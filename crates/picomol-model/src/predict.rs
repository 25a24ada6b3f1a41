//! Prediction and ranking of uploaded compounds.

use tracing::debug;

use picomol_common::error::{PicomolError, Result};
use picomol_common::table::{FeatureMatrix, Prediction};

use crate::artifact::ScoringModel;

/// Score every row of the feature matrix: one predicted pIC50 per compound,
/// in matrix row order.
///
/// The matrix must carry exactly the columns the model was trained on, in
/// the model's order; any divergence is a processing error.
pub fn predict(model: &ScoringModel, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
    if matrix.feature_names != model.feature_names {
        return Err(PicomolError::Processing(format!(
            "feature matrix columns do not match the model: expected {:?}, got {:?}",
            model.feature_names, matrix.feature_names
        )));
    }

    if let Some(row) = matrix.rows.iter().find(|r| r.len() != model.feature_count()) {
        return Err(PicomolError::Processing(format!(
            "feature row has {} values, model expects {}",
            row.len(),
            model.feature_count()
        )));
    }

    let scores: Vec<f64> = matrix.rows.iter().map(|row| model.score_row(row)).collect();
    debug!(compounds = scores.len(), "Scored feature matrix");
    Ok(scores)
}

/// Pair row i's score with identifier i and sort descending by score.
///
/// The sort is stable: compounds with equal scores keep their upload order.
pub fn rank_predictions(ids: Vec<String>, scores: Vec<f64>) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = ids
        .into_iter()
        .zip(scores)
        .map(|(compound_id, pic50)| Prediction { compound_id, pic50 })
        .collect();
    predictions.sort_by(|a, b| b.pic50.partial_cmp(&a.pic50).unwrap_or(std::cmp::Ordering::Equal));
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Estimator, LinearModel};

    fn model() -> ScoringModel {
        ScoringModel {
            feature_names: vec!["f2".into(), "f1".into()],
            estimator: Estimator::Linear(LinearModel {
                intercept: 0.0,
                coefficients: vec![1.0, 1.0],
            }),
        }
    }

    fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        FeatureMatrix {
            feature_names: vec!["f2".into(), "f1".into()],
            ids: (1..=rows.len()).map(|i| format!("m{i}")).collect(),
            rows,
        }
    }

    #[test]
    fn test_predict_row_order_preserved() {
        let scores = predict(&model(), &matrix(vec![vec![2.0, 1.0], vec![5.0, 4.0]])).unwrap();
        assert_eq!(scores, vec![3.0, 9.0]);
    }

    #[test]
    fn test_predict_rejects_column_mismatch() {
        let mut m = matrix(vec![vec![1.0, 2.0]]);
        m.feature_names = vec!["f1".into(), "f2".into()];
        let err = predict(&model(), &m).unwrap_err();
        assert!(matches!(err, PicomolError::Processing(_)));
    }

    #[test]
    fn test_ranking_is_descending() {
        let ranked = rank_predictions(
            vec!["a".into(), "b".into(), "c".into()],
            vec![1.0, 7.5, 4.2],
        );
        let scores: Vec<f64> = ranked.iter().map(|p| p.pic50).collect();
        assert_eq!(scores, vec![7.5, 4.2, 1.0]);
        assert_eq!(ranked[0].compound_id, "b");
        for pair in ranked.windows(2) {
            assert!(pair[0].pic50 >= pair[1].pic50);
        }
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let ranked = rank_predictions(
            vec!["first".into(), "second".into(), "third".into()],
            vec![5.0, 5.0, 9.0],
        );
        assert_eq!(ranked[0].compound_id, "third");
        // Equal scores keep upload order.
        assert_eq!(ranked[1].compound_id, "first");
        assert_eq!(ranked[2].compound_id, "second");
    }

    #[test]
    fn test_duplicate_identifiers_are_preserved() {
        let ranked = rank_predictions(vec!["m1".into(), "m1".into()], vec![2.0, 8.0]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].pic50, 8.0);
        assert_eq!(ranked[1].pic50, 2.0);
    }
}
