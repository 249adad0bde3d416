//! Bucket boundary generators.
//!
//! Every generator returns the ascending upper bounds of the finite buckets.
//! The terminal `+Inf` bucket is implicit and never part of the result.

use crate::error::{Error, Result};

/// Default histogram buckets, tailored to broadly measure the response time
/// (in seconds) of a network service.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Creates `count` buckets, each `width` wide, where the lowest bucket has an
/// upper bound of `start`.
///
/// `start` and `width` must not be negative and `count` must be positive.
/// A zero `width` is only accepted for a single bucket, since repeated
/// boundaries are rejected by [`validate_boundaries`](crate::validate_boundaries).
pub fn linear_buckets(start: f64, width: f64, count: usize) -> Result<Vec<f64>> {
    if !(start >= 0.0) {
        return Err(Error::InvalidParameter(format!("start must not be negative, got {start}")));
    }
    if !(width >= 0.0) {
        return Err(Error::InvalidParameter(format!("width must not be negative, got {width}")));
    }
    if count < 1 {
        return Err(Error::InvalidParameter("count must be positive".into()));
    }
    if width == 0.0 && count > 1 {
        return Err(Error::InvalidParameter(format!(
            "width must be positive for {count} buckets"
        )));
    }

    let mut buckets = Vec::with_capacity(count);
    for i in 0..count {
        buckets.push(start + width * (i as f64));
    }
    Ok(buckets)
}

/// Creates `count` buckets where the lowest bucket has an upper bound of
/// `start` and each following bucket's upper bound is `factor` times the
/// previous one.
///
/// `start` must be positive, `factor` must be greater than 1 and `count`
/// must be positive.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Result<Vec<f64>> {
    if !(start > 0.0) {
        return Err(Error::InvalidParameter(format!("start must be positive, got {start}")));
    }
    if !(factor > 1.0) {
        return Err(Error::InvalidParameter(format!(
            "factor must be greater than 1, got {factor}"
        )));
    }
    if count < 1 {
        return Err(Error::InvalidParameter("count must be positive".into()));
    }

    let mut buckets = Vec::with_capacity(count);
    let mut current = start;
    for _ in 0..count {
        buckets.push(current);
        current *= factor;
    }
    Ok(buckets)
}

/// Creates `count` exponentially growing buckets spanning `min..=max`.
///
/// The growth factor is solved from `max = min * factor^(count - 1)`, so the
/// last bucket equals `max` up to floating point rounding.
pub fn exponential_buckets_range(min: f64, max: f64, count: usize) -> Result<Vec<f64>> {
    if !(min > 0.0) {
        return Err(Error::InvalidParameter(format!("min must be positive, got {min}")));
    }
    if !(max > min) {
        return Err(Error::InvalidParameter(format!(
            "max must be greater than min, got min={min} max={max}"
        )));
    }
    if count < 1 {
        return Err(Error::InvalidParameter("count must be positive".into()));
    }

    let growth = (max / min).powf(1.0 / (count - 1) as f64);
    let buckets = (0..count).map(|i| min * growth.powf(i as f64)).collect();
    Ok(buckets)
}
