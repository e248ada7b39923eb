//! Chronological fit/evaluation partitioning.

use fx_core::{Error, Result};

/// Split rows into a leading fit partition and a trailing evaluation
/// partition at `fit_ratio`.
///
/// The split is strictly positional. Shuffling here would leak future
/// information into the fit partition through the lag and label
/// columns, so no shuffled variant exists.
pub fn chronological_split<T>(rows: &[T], fit_ratio: f64) -> Result<(&[T], &[T])> {
    if !(fit_ratio > 0.0 && fit_ratio < 1.0) {
        return Err(Error::config(format!(
            "fit_ratio must be in (0, 1), got {fit_ratio}"
        )));
    }
    let boundary = (rows.len() as f64 * fit_ratio).floor() as usize;
    Ok(rows.split_at(boundary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ratio() {
        let rows: Vec<u32> = (0..10).collect();
        let (fit, eval) = chronological_split(&rows, 0.8).unwrap();
        assert_eq!(fit, &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(eval, &[8, 9]);
    }

    #[test]
    fn test_boundary_rounds_down() {
        let rows: Vec<u32> = (0..7).collect();
        let (fit, eval) = chronological_split(&rows, 0.8).unwrap();
        assert_eq!(fit.len(), 5); // floor(5.6)
        assert_eq!(eval.len(), 2);
    }

    #[test]
    fn test_order_is_preserved() {
        let rows: Vec<u32> = (0..100).collect();
        let (fit, eval) = chronological_split(&rows, 0.6).unwrap();
        assert!(fit.windows(2).all(|w| w[0] < w[1]));
        assert!(eval.windows(2).all(|w| w[0] < w[1]));
        assert!(fit.last().unwrap() < eval.first().unwrap());
    }

    #[test]
    fn test_degenerate_ratios_rejected() {
        let rows = [1, 2, 3];
        assert!(chronological_split(&rows, 0.0).is_err());
        assert!(chronological_split(&rows, 1.0).is_err());
        assert!(chronological_split(&rows, -0.5).is_err());
        assert!(chronological_split(&rows, f64::NAN).is_err());
    }

    #[test]
    fn test_empty_input() {
        let rows: [u32; 0] = [];
        let (fit, eval) = chronological_split(&rows, 0.8).unwrap();
        assert!(fit.is_empty());
        assert!(eval.is_empty());
    }
}
