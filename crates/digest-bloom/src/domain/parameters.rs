//! Closed-form Bloom filter sizing
//!
//! Formulas:
//! - k = ceil(ln(2) * m / n)              -- optimal hash count for m bits, n inserts
//! - m = -n * ln(epsilon) / (ln(2)^2)     -- bits needed for a target FPR
//! - FPR = (1 - e^(-kn/m))^k
//! - n_hat = -(m / k) * ln(1 - X / m)     -- distinct keys from X set bits

use std::f64::consts::LN_2;

use crate::error::FilterError;

/// Largest bit count the sizing helpers will hand out
pub const MAX_SIZE_BITS: usize = 1 << 48;

/// Power-of-two storage capacity backing `m` addressable bits.
///
/// # Errors
/// `InvalidConfiguration` when `m` is zero or its capacity exceeds
/// [`MAX_SIZE_BITS`].
pub fn storage_capacity(m: usize) -> Result<usize, FilterError> {
    if m == 0 {
        return Err(FilterError::invalid("bit count must be positive"));
    }
    match m.checked_next_power_of_two() {
        Some(capacity) if capacity <= MAX_SIZE_BITS => Ok(capacity),
        _ => Err(FilterError::invalid(format!(
            "bit count {m} needs more than {MAX_SIZE_BITS} bits of storage"
        ))),
    }
}

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct FilterParams {
    /// Number of addressable bits (m)
    pub size_bits: usize,
    /// Number of indices per key (k)
    pub hash_count: usize,
    /// Expected false positive rate after `expected_insertions` keys
    pub expected_fpr: f64,
}

/// Optimal hash count for `m` bits and `n` expected insertions.
///
/// Rounds `ln(2) * m / n` up and never returns less than one.
pub fn optimal_hash_count(m: usize, n: usize) -> Result<usize, FilterError> {
    if m == 0 {
        return Err(FilterError::invalid("bit count must be positive"));
    }
    if n == 0 {
        return Err(FilterError::invalid("expected insertions must be positive"));
    }

    let k = (LN_2 * m as f64 / n as f64).ceil() as usize;
    Ok(k.max(1))
}

/// Bits required to hold `n` keys at false positive rate `epsilon`.
///
/// The closed form `-(n * ln(epsilon)) / ln(2)^2` is truncated to whole bits,
/// and never drops below one bit.
pub fn required_bits(epsilon: f64, n: usize) -> Result<usize, FilterError> {
    if !(epsilon > 0.0 && epsilon < 1.0) {
        return Err(FilterError::invalid(format!(
            "false positive rate must lie in (0, 1), got {epsilon}"
        )));
    }
    if n == 0 {
        return Err(FilterError::invalid("expected insertions must be positive"));
    }

    let bits = -(n as f64 * epsilon.ln()) / (LN_2 * LN_2);
    if bits >= MAX_SIZE_BITS as f64 {
        return Err(FilterError::invalid(format!(
            "{n} insertions at rate {epsilon} need {bits:.0} bits, more than {MAX_SIZE_BITS}"
        )));
    }

    Ok((bits as usize).max(1))
}

/// Parameters for a filter of `m` bits expecting `n` insertions
pub fn params_for_insertions(m: usize, n: usize) -> Result<FilterParams, FilterError> {
    let k = optimal_hash_count(m, n)?;
    Ok(FilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr: calculate_fpr(m, n, k),
    })
}

/// Parameters for `n` insertions at false positive rate `epsilon`
pub fn params_for_false_positive_rate(
    epsilon: f64,
    n: usize,
) -> Result<FilterParams, FilterError> {
    let m = required_bits(epsilon, n)?;
    params_for_insertions(m, n)
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Estimate the number of distinct keys behind `filled` set bits.
///
/// Returns `0.0` for an empty filter and `f64::INFINITY` once every
/// addressable bit is set, where the estimator has no finite answer.
pub fn estimate_cardinality(m: usize, k: usize, filled: usize) -> f64 {
    if filled == 0 || m == 0 || k == 0 {
        return 0.0;
    }
    if filled >= m {
        return f64::INFINITY;
    }

    let m = m as f64;
    let fill = filled as f64 / m;
    -(m / k as f64) * (-fill).ln_1p()
}
