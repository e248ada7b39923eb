//! Classifier artifact loading.

use std::path::Path;

use fx_core::{Classifier, Error, Result};
use tracing::info;

/// Load a classifier artifact from `path`.
///
/// A missing file maps to [`Error::MissingArtifact`] so callers can
/// present "train a model first" instead of a generic I/O failure.
/// The artifact is never rebuilt implicitly.
pub fn load_classifier<C: Classifier>(path: &Path) -> Result<C> {
    if !path.exists() {
        return Err(Error::MissingArtifact(path.to_path_buf()));
    }
    let model = C::load(path)?;
    info!(path = %path.display(), "loaded classifier artifact");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_core::MajorityClassifier;

    #[test]
    fn test_missing_artifact_is_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        match load_classifier::<MajorityClassifier>(&path) {
            Err(Error::MissingArtifact(p)) => assert_eq!(p, path),
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
    }

    #[test]
    fn test_load_after_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut model = MajorityClassifier::new();
        model.fit(&[vec![0.0], vec![0.0]], &[1, 0]).unwrap();
        model.save(&path).unwrap();

        let loaded: MajorityClassifier = load_classifier(&path).unwrap();
        assert_eq!(
            loaded.predict_probability(&[0.0]).unwrap(),
            model.predict_probability(&[0.0]).unwrap()
        );
    }
}
