//! Declarative histogram config (strict parsing).
//!
//! ```yaml
//! version: 1
//! histograms:
//!   - name: 'request_duration_seconds{path="/api"}'
//!     buckets: { kind: default }
//!   - name: response_size_bytes
//!     buckets: { kind: exponential, start: 100, factor: 2, count: 8 }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::buckets::{
    DEFAULT_BUCKETS, exponential_buckets, exponential_buckets_range, linear_buckets,
};
use crate::error::{Error, Result};
use crate::validator::{validate_boundaries, validate_identifier};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    pub version: u32,

    #[serde(default)]
    pub histograms: Vec<HistogramConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramConfig {
    pub name: String,

    #[serde(default)]
    pub buckets: BucketLayout,
}

/// How a histogram's bounds are produced.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum BucketLayout {
    /// [`DEFAULT_BUCKETS`].
    #[default]
    Default,
    Explicit {
        bounds: Vec<f64>,
    },
    Linear {
        start: f64,
        width: f64,
        count: usize,
    },
    Exponential {
        start: f64,
        factor: f64,
        count: usize,
    },
    ExponentialRange {
        min: f64,
        max: f64,
        count: usize,
    },
}

impl BucketLayout {
    pub fn bounds(&self) -> Result<Vec<f64>> {
        match *self {
            BucketLayout::Default => Ok(DEFAULT_BUCKETS.to_vec()),
            BucketLayout::Explicit { ref bounds } => Ok(bounds.clone()),
            BucketLayout::Linear {
                start,
                width,
                count,
            } => linear_buckets(start, width, count),
            BucketLayout::Exponential {
                start,
                factor,
                count,
            } => exponential_buckets(start, factor, count),
            BucketLayout::ExponentialRange { min, max, count } => {
                exponential_buckets_range(min, max, count)
            }
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        let mut seen = HashSet::new();
        for histogram in &self.histograms {
            validate_identifier(&histogram.name)?;
            validate_boundaries(&histogram.buckets.bounds()?)?;
            if !seen.insert(histogram.name.as_str()) {
                return Err(Error::Config(format!(
                    "histogram {:?} is declared more than once",
                    histogram.name
                )));
            }
        }
        Ok(())
    }
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RegistryConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RegistryConfig> {
    let cfg: RegistryConfig =
        serde_yaml::from_str(s).map_err(|e| Error::Config(format!("invalid yaml: {e}")))?;
    if let Err(err) = cfg.validate() {
        tracing::warn!(%err, "rejected histogram config");
        return Err(err);
    }
    tracing::debug!(histograms = cfg.histograms.len(), "loaded histogram config");
    Ok(cfg)
}
