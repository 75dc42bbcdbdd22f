//! Approximate Median Significance.
//!
//! ```text
//! AMS = sqrt( 2 * ( (s + b + b_r) * ln(1 + s / (b + b_r)) - s ) )
//! ```
//!
//! where `s` and `b` are the weighted signal and background sums of the events a
//! submission selected, and `b_r` is a fixed regularisation term that damps the
//! metric when very few background events are selected.

use crate::types::ScoreError;

/// The regularisation constant `b_r` added to the background sum.
pub const BACKGROUND_REGULARIZATION: f64 = 10.0;

/// Evaluates AMS for the given weighted sums.
///
/// The radicand is non-negative for any non-negative `s` and `b`; if it is not
/// (negative weights, or a NaN from a logarithm of a non-positive argument), the
/// evaluation fails with `NegativeRadicand` instead of clamping.
pub fn ams(signal: f64, background: f64) -> Result<f64, ScoreError> {
    let regularized_background = background + BACKGROUND_REGULARIZATION;
    let radicand = 2.0
        * ((signal + regularized_background) * (1.0 + signal / regularized_background).ln()
            - signal);

    if radicand.is_nan() || radicand < 0.0 {
        return Err(ScoreError::NegativeRadicand { radicand });
    }
    Ok(radicand.sqrt())
}
