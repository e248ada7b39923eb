//! Evaluation metrics for a fitted classifier.

use fx_core::{Error, Result};
use fx_features::FeatureSchema;
use serde::{Deserialize, Serialize};

/// Precision/recall for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Correct predictions of this class / all predictions of it.
    pub precision: f64,
    /// Correct predictions of this class / all actual occurrences.
    pub recall: f64,
    /// Actual occurrences in the evaluation partition.
    pub support: usize,
}

/// Evaluation partition metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub accuracy: f64,
    pub up: ClassMetrics,
    pub down: ClassMetrics,
}

/// Outcome of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub pair_name: String,
    /// Schema the classifier was fitted on; inference must match it.
    pub schema: FeatureSchema,
    pub fit_rows: usize,
    pub eval_rows: usize,
    pub metrics: EvalMetrics,
}

/// Compute accuracy and per-class precision/recall from aligned
/// `(label, prediction)` pairs. Zero-denominator cases (a class never
/// predicted, or absent from the partition) report 0 rather than NaN.
pub fn evaluate(labels: &[u8], predictions: &[u8]) -> Result<EvalMetrics> {
    if labels.len() != predictions.len() {
        return Err(Error::config(format!(
            "{} labels but {} predictions",
            labels.len(),
            predictions.len()
        )));
    }
    if labels.is_empty() {
        return Err(Error::insufficient_data("empty evaluation partition"));
    }

    let mut correct = 0usize;
    // [predicted][actual] counts for classes (down, up).
    let mut counts = [[0usize; 2]; 2];
    for (&label, &pred) in labels.iter().zip(predictions) {
        if label == pred {
            correct += 1;
        }
        counts[usize::from(pred == 1)][usize::from(label == 1)] += 1;
    }

    let class = |c: usize| {
        let tp = counts[c][c];
        let predicted = counts[c][0] + counts[c][1];
        let actual = counts[0][c] + counts[1][c];
        ClassMetrics {
            precision: ratio(tp, predicted),
            recall: ratio(tp, actual),
            support: actual,
        }
    };

    Ok(EvalMetrics {
        accuracy: correct as f64 / labels.len() as f64,
        up: class(1),
        down: class(0),
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hand_checked_confusion_matrix() {
        let labels = [1, 1, 0, 0, 1];
        let predictions = [1, 0, 0, 1, 1];
        let metrics = evaluate(&labels, &predictions).unwrap();

        assert_relative_eq!(metrics.accuracy, 0.6);
        assert_relative_eq!(metrics.up.precision, 2.0 / 3.0);
        assert_relative_eq!(metrics.up.recall, 2.0 / 3.0);
        assert_eq!(metrics.up.support, 3);
        assert_relative_eq!(metrics.down.precision, 0.5);
        assert_relative_eq!(metrics.down.recall, 0.5);
        assert_eq!(metrics.down.support, 2);
    }

    #[test]
    fn test_perfect_predictions() {
        let labels = [1, 0, 1];
        let metrics = evaluate(&labels, &labels).unwrap();
        assert_relative_eq!(metrics.accuracy, 1.0);
        assert_relative_eq!(metrics.up.precision, 1.0);
        assert_relative_eq!(metrics.down.recall, 1.0);
    }

    #[test]
    fn test_never_predicted_class_reports_zero() {
        let labels = [1, 0, 1, 0];
        let predictions = [1, 1, 1, 1];
        let metrics = evaluate(&labels, &predictions).unwrap();
        assert_relative_eq!(metrics.down.precision, 0.0);
        assert_relative_eq!(metrics.down.recall, 0.0);
        assert_relative_eq!(metrics.up.recall, 1.0);
        assert_relative_eq!(metrics.up.precision, 0.5);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(evaluate(&[1, 0], &[1]).is_err());
    }

    #[test]
    fn test_empty_partition_rejected() {
        assert!(matches!(
            evaluate(&[], &[]),
            Err(Error::InsufficientData(_))
        ));
    }
}
