use std::fmt::{self, Write};
use std::time::Instant;

use parking_lot::Mutex;

use crate::error::Result;
use crate::validator::{add_tag, split_identifier, validate_boundaries, validate_identifier};

/// A histogram for non-negative values with statically declared buckets.
///
/// Each bucket counts the values `v` with `previous < v <= le`. Values above
/// the last bound land in the implicit `+Inf` bucket. Serialized, a histogram
/// produces one cumulative line per bucket:
///
/// ```text
/// <name>_bucket{<optional_tags>,le="<le>"} <cumulative count>
/// ```
///
/// followed by `<name>_sum` and `<name>_count` once anything was recorded.
///
/// The histogram is safe to share between threads. One lock covers the sum
/// and every counter, so a serialized snapshot is always self-consistent.
#[derive(Debug)]
pub struct HistogramStatic {
    name: Box<str>,
    bounds: Box<[f64]>,
    // `bounds` rendered as `%.3e`, kept next to them so visiting allocates nothing.
    labels: Box<[String]>,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    counts: Box<[u64]>,
    overflow: u64,
    sum: f64,
}

impl HistogramStatic {
    /// Creates a histogram called `name` with the given upper bounds.
    ///
    /// `name` must be a valid identifier, e.g. `foo` or `foo{bar="baz"}`, and
    /// `bounds` must be finite, non-negative and strictly increasing. An empty
    /// `bounds` gives a histogram where every value lands in `+Inf`.
    pub fn new(name: &str, bounds: &[f64]) -> Result<Self> {
        validate_identifier(name)?;
        validate_boundaries(bounds)?;

        tracing::debug!(name, buckets = bounds.len(), "created static histogram");

        Ok(Self {
            name: name.into(),
            bounds: bounds.into(),
            labels: bounds.iter().map(|&le| format_le(le)).collect(),
            state: Mutex::new(State {
                counts: vec![0; bounds.len()].into_boxed_slice(),
                overflow: 0,
                sum: 0.0,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Records `v`.
    ///
    /// NaN and negative values are outside the histogram's domain and are
    /// ignored.
    pub fn update(&self, v: f64) {
        if v.is_nan() || v < 0.0 {
            return;
        }
        let bucket = match self.bounds.last() {
            Some(&last) if v <= last => Some(self.bounds.partition_point(|&le| le < v)),
            _ => None,
        };

        let mut state = self.state.lock();
        state.sum += v;
        match bucket {
            Some(idx) => state.counts[idx] += 1,
            None => state.overflow += 1,
        }
    }

    /// Records the time elapsed since `start`, in seconds.
    pub fn update_duration(&self, start: Instant) {
        self.update(start.elapsed().as_secs_f64());
    }

    /// Zeroes every counter and the sum. Bounds are kept.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.counts.fill(0);
        state.overflow = 0;
        state.sum = 0.0;
    }

    /// Calls `f` with the bound and the raw (non-cumulative) count of every
    /// bucket in ascending order, then with `"+Inf"` and the overflow count.
    ///
    /// Bounds are rendered as `%.3e`, e.g. `1.000e+02`. `f` runs while the
    /// histogram is locked: it must be quick and must not touch this
    /// histogram again.
    pub fn visit_buckets<F: FnMut(&str, u64)>(&self, f: F) {
        self.visit(f);
    }

    // Visits under the lock and returns the sum observed under that same lock.
    fn visit<F: FnMut(&str, u64)>(&self, mut f: F) -> f64 {
        let state = self.state.lock();
        for (le, &count) in self.labels.iter().zip(state.counts.iter()) {
            f(le, count);
        }
        f("+Inf", state.overflow);
        state.sum
    }

    pub fn sum(&self) -> f64 {
        self.state.lock().sum
    }

    /// Number of recorded values, `+Inf` bucket included.
    pub fn count(&self) -> u64 {
        let state = self.state.lock();
        state.counts.iter().sum::<u64>() + state.overflow
    }

    /// Writes the histogram in Prometheus text format under `identifier`.
    ///
    /// Bucket lines are always written, so an untouched histogram stays
    /// visible. The `_sum` and `_count` lines are only written once at least
    /// one value was recorded.
    pub fn serialize<W: Write>(&self, identifier: &str, w: &mut W) -> fmt::Result {
        let mut total = 0u64;
        let mut written = Ok(());
        let sum = self.visit(|le, count| {
            total += count;
            if written.is_ok() {
                let tagged = add_tag(identifier, &format!("le=\"{le}\""));
                let (root, tags) = split_identifier(&tagged);
                written = writeln!(w, "{root}_bucket{tags} {total}");
            }
        });
        written?;

        if total == 0 {
            return Ok(());
        }
        let (root, tags) = split_identifier(identifier);
        write!(w, "{root}_sum{tags} ")?;
        write_sum(w, sum)?;
        writeln!(w)?;
        writeln!(w, "{root}_count{tags} {total}")
    }

    /// Writes the histogram under the name it was created with.
    pub fn write_to<W: Write>(&self, w: &mut W) -> fmt::Result {
        self.serialize(&self.name, w)
    }
}

/// Formats a bound like C's `%.3e`: three decimals and an exponent of at
/// least two digits.
fn format_le(le: f64) -> String {
    let formatted = format!("{le:.3e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) => format!("{mantissa}e{}", pad_exponent(exp)),
        None => formatted,
    }
}

fn pad_exponent(exp: &str) -> String {
    match exp.strip_prefix('-') {
        Some(digits) => format!("-{digits:0>2}"),
        None => format!("+{exp:0>2}"),
    }
}

/// Writes integral sums without a fraction and everything else in the
/// shortest form that parses back to the same value, switching to
/// exponent notation below `1e-4` and from `1e6` on.
fn write_sum<W: Write>(w: &mut W, sum: f64) -> fmt::Result {
    if sum.is_infinite() {
        return w.write_str(if sum > 0.0 { "+Inf" } else { "-Inf" });
    }
    if sum.fract() == 0.0 && sum.abs() < i64::MAX as f64 {
        return write!(w, "{}", sum as i64);
    }

    let shortest = format!("{sum:e}");
    let Some((mantissa, exp)) = shortest.split_once('e') else {
        return write!(w, "{sum}");
    };
    let exponent: i32 = exp.parse().map_err(|_| fmt::Error)?;
    if (-4..6).contains(&exponent) {
        write!(w, "{sum}")
    } else {
        write!(w, "{mantissa}e{}", pad_exponent(exp))
    }
}
