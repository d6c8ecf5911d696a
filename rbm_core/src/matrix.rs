//! Dense matrix helpers shared by the sampling and scoring code.
//!
//! Matrices follow the column-sample layout used across the crate: each
//! column is one sample, each row one unit.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::error::{RbmError, RbmResult};

/// Logistic sigmoid `1 / (1 + e^-x)`.
pub fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^x)` without overflow for large `x`.
pub fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// `ln(logistic(x))`, stable for large negative `x`.
pub fn log_logistic(x: f64) -> f64 {
    -softplus(-x)
}

/// Applies `f` to every element, in parallel when the buffer is contiguous.
pub(crate) fn par_map_inplace<F>(matrix: &mut Array2<f64>, f: F)
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    if let Some(slice) = matrix.as_slice_mut() {
        slice.par_iter_mut().for_each(|value| *value = f(*value));
    } else {
        matrix.mapv_inplace(f);
    }
}

/// Adds `bias[i]` to every element of row `i`.
pub(crate) fn add_row_bias(matrix: &mut Array2<f64>, bias: &Array1<f64>) {
    *matrix += &bias.view().insert_axis(Axis(1));
}

/// Fails unless `matrix` has exactly `expected` rows.
pub(crate) fn ensure_rows(
    context: &str,
    matrix: &ArrayView2<'_, f64>,
    expected: usize,
) -> RbmResult<()> {
    if matrix.nrows() != expected {
        return Err(RbmError::shape(context, expected, matrix.nrows()));
    }
    Ok(())
}

/// Fails on the first element outside [0, 1]. NaN is rejected as well.
pub fn ensure_unit_interval(data: &ArrayView2<'_, f64>) -> RbmResult<()> {
    for ((row, col), &value) in data.indexed_iter() {
        if !(0.0..=1.0).contains(&value) {
            return Err(RbmError::InvalidInputRange { row, col, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_logistic_symmetry() {
        assert!((logistic(0.0) - 0.5).abs() < 1e-12);
        assert!((logistic(2.0) + logistic(-2.0) - 1.0).abs() < 1e-12);
        assert!(logistic(-800.0) >= 0.0);
        assert!(logistic(800.0) <= 1.0);
    }

    #[test]
    fn test_softplus_matches_naive_form() {
        for x in [-5.0, -0.5, 0.0, 0.5, 5.0] {
            let naive = (1.0 + f64::exp(x)).ln();
            assert!((softplus(x) - naive).abs() < 1e-12);
        }
        assert!((softplus(1000.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_logistic_is_non_positive() {
        for x in [-50.0, -1.0, 0.0, 1.0, 50.0] {
            assert!(log_logistic(x) <= 0.0);
        }
        assert!((log_logistic(0.0) - 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_add_row_bias_broadcasts_over_columns() {
        let mut m = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        add_row_bias(&mut m, &array![10.0, -1.0]);
        assert_eq!(m, array![[11.0, 12.0, 13.0], [3.0, 4.0, 5.0]]);
    }

    #[test]
    fn test_par_map_handles_transposed_layout() {
        let base = array![[0.0, 1.0], [2.0, 3.0]];
        let mut m = base.t().to_owned();
        par_map_inplace(&mut m, |v| v * 2.0);
        assert_eq!(m, array![[0.0, 4.0], [2.0, 6.0]]);
    }

    #[test]
    fn test_unit_interval_check() {
        let ok = array![[0.0, 1.0], [0.25, 0.75]];
        assert!(ensure_unit_interval(&ok.view()).is_ok());

        let bad = array![[0.0, 1.0], [1.5, 0.75]];
        assert_eq!(
            ensure_unit_interval(&bad.view()),
            Err(RbmError::InvalidInputRange {
                row: 1,
                col: 0,
                value: 1.5
            })
        );

        let nan = array![[f64::NAN]];
        assert!(ensure_unit_interval(&nan.view()).is_err());
    }
}
