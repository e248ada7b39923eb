//! Classifier boundary.
//!
//! The actual learner (gradient boosting in production) is external to
//! this workspace; everything here talks to it through the
//! [`Classifier`] trait. The model artifact is an opaque blob keyed by
//! a file path.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Binary classifier over fixed-width feature vectors.
///
/// Class 0 means "down", class 1 means "up". Probability pairs are
/// indexed the same way and sum to one.
pub trait Classifier {
    /// Fit the model on `(features, labels)` rows. Rows must be in
    /// chronological order; the trait takes them as given.
    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<()>;

    /// Predict the class for one feature vector.
    fn predict(&self, features: &[f64]) -> Result<u8>;

    /// Predict the `[down, up]` probability pair for one vector.
    fn predict_probability(&self, features: &[f64]) -> Result<[f64; 2]>;

    /// Persist the fitted model to `path`.
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a fitted model from `path`.
    fn load(path: &Path) -> Result<Self>
    where
        Self: Sized;
}

/// Deterministic baseline classifier: predicts the majority class of
/// the fit partition, with observed class frequencies as the
/// probability pair.
///
/// Used as the cold-start model and as the stand-in learner in tests;
/// it exercises the full fit/predict/save/load surface without any
/// external dependency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MajorityClassifier {
    /// Observed label counts, indexed by class.
    class_counts: [u64; 2],
    /// Feature vector width seen at fit time.
    n_features: usize,
}

impl MajorityClassifier {
    /// Create an unfitted classifier.
    pub fn new() -> Self {
        Self::default()
    }

    fn total(&self) -> u64 {
        self.class_counts[0] + self.class_counts[1]
    }

    fn check_fitted(&self, features: &[f64]) -> Result<()> {
        if self.total() == 0 {
            return Err(Error::classifier("model has not been fitted"));
        }
        if features.len() != self.n_features {
            return Err(Error::classifier(format!(
                "feature width mismatch: fitted on {}, got {}",
                self.n_features,
                features.len()
            )));
        }
        Ok(())
    }
}

impl Classifier for MajorityClassifier {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<()> {
        if features.len() != labels.len() {
            return Err(Error::classifier(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(Error::classifier("empty fit partition"));
        }

        self.n_features = features[0].len();
        self.class_counts = [0, 0];
        for label in labels {
            match label {
                0 | 1 => self.class_counts[*label as usize] += 1,
                other => {
                    return Err(Error::classifier(format!("non-binary label {other}")));
                }
            }
        }
        Ok(())
    }

    fn predict(&self, features: &[f64]) -> Result<u8> {
        let [down, up] = self.predict_probability(features)?;
        Ok(u8::from(up >= down))
    }

    fn predict_probability(&self, features: &[f64]) -> Result<[f64; 2]> {
        self.check_fitted(features)?;
        let total = self.total() as f64;
        Ok([
            self.class_counts[0] as f64 / total,
            self.class_counts[1] as f64 / total,
        ])
    }

    fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let model = serde_json::from_reader(BufReader::new(file))?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> MajorityClassifier {
        let features = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let labels = vec![1, 1, 0];
        let mut model = MajorityClassifier::new();
        model.fit(&features, &labels).unwrap();
        model
    }

    #[test]
    fn test_unfitted_predict_fails() {
        let model = MajorityClassifier::new();
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_majority_probabilities() {
        let model = fitted();
        let [down, up] = model.predict_probability(&[0.0, 0.0]).unwrap();
        assert!((down - 1.0 / 3.0).abs() < 1e-12);
        assert!((up - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_feature_width_mismatch() {
        let model = fitted();
        assert!(model.predict(&[0.0]).is_err());
    }

    #[test]
    fn test_non_binary_label_rejected() {
        let mut model = MajorityClassifier::new();
        assert!(model.fit(&[vec![1.0]], &[2]).is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let model = fitted();
        model.save(&path).unwrap();
        let loaded = MajorityClassifier::load(&path).unwrap();

        assert_eq!(
            loaded.predict_probability(&[0.0, 0.0]).unwrap(),
            model.predict_probability(&[0.0, 0.0]).unwrap()
        );
    }
}
