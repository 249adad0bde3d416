//! Named collection of histograms.
//!
//! A `Registry` is an explicit object: create one, hand it to whoever records
//! metrics, and dump it from whoever exports them. There is no process-wide
//! default instance.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::histogram::HistogramStatic;

#[derive(Debug, Default)]
pub struct Registry {
    histograms: RwLock<BTreeMap<String, Arc<HistogramStatic>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry holding every histogram declared in `config`.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let registry = Self::new();
        for decl in &config.histograms {
            registry.new_histogram(&decl.name, &decl.buckets.bounds()?)?;
        }
        Ok(registry)
    }

    /// Creates and registers a histogram under `name`.
    ///
    /// Fails if `name` or `bounds` are invalid, or if `name` is already
    /// registered.
    pub fn new_histogram(&self, name: &str, bounds: &[f64]) -> Result<Arc<HistogramStatic>> {
        let histogram = Arc::new(HistogramStatic::new(name, bounds)?);

        let mut histograms = self.histograms.write();
        if histograms.contains_key(name) {
            tracing::warn!(name, "histogram is already registered");
            return Err(Error::AlreadyRegistered(name.to_string()));
        }
        histograms.insert(name.to_string(), Arc::clone(&histogram));
        tracing::debug!(name, "registered histogram");
        Ok(histogram)
    }

    /// Returns the histogram registered under `name`, creating it with
    /// `bounds` when missing.
    ///
    /// Repeated calls with the same name and bounds return the same instance.
    /// An existing histogram with different bounds is an error, never a
    /// silently reused shape.
    pub fn get_or_create_histogram(
        &self,
        name: &str,
        bounds: &[f64],
    ) -> Result<Arc<HistogramStatic>> {
        if let Some(existing) = self.histograms.read().get(name) {
            return Self::matching(existing, name, bounds);
        }

        let created = HistogramStatic::new(name, bounds)?;
        let mut histograms = self.histograms.write();
        // Another caller may have won the race between the two locks.
        if let Some(existing) = histograms.get(name) {
            return Self::matching(existing, name, bounds);
        }
        let created = Arc::new(created);
        histograms.insert(name.to_string(), Arc::clone(&created));
        tracing::debug!(name, "registered histogram");
        Ok(created)
    }

    fn matching(
        existing: &Arc<HistogramStatic>,
        name: &str,
        bounds: &[f64],
    ) -> Result<Arc<HistogramStatic>> {
        if existing.bounds() != bounds {
            tracing::warn!(
                name,
                registered = ?existing.bounds(),
                requested = ?bounds,
                "histogram bucket mismatch"
            );
            return Err(Error::BucketMismatch {
                name: name.to_string(),
            });
        }
        Ok(Arc::clone(existing))
    }

    pub fn get(&self, name: &str) -> Option<Arc<HistogramStatic>> {
        self.histograms.read().get(name).cloned()
    }

    /// Removes `name` from the registry. Outstanding handles keep working but
    /// are no longer exported.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.histograms.write().remove(name).is_some();
        if removed {
            tracing::debug!(name, "unregistered histogram");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.histograms.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.read().is_empty()
    }

    /// Registered names in export order.
    pub fn names(&self) -> Vec<String> {
        self.histograms.read().keys().cloned().collect()
    }

    /// Writes every registered histogram in Prometheus text format.
    pub fn write_prometheus<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.to_string().as_bytes())
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Clone the handles so serialization does not hold the registry lock.
        let histograms: Vec<_> = self.histograms.read().values().cloned().collect();
        for histogram in histograms {
            histogram.write_to(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_histogram_rejects_duplicates() {
        let registry = Registry::new();
        registry.new_histogram("dup", &[1.0]).unwrap();
        assert_eq!(
            registry.new_histogram("dup", &[1.0]).unwrap_err(),
            Error::AlreadyRegistered("dup".into())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_new_histogram_rejects_invalid_input() {
        let registry = Registry::new();
        assert!(matches!(
            registry.new_histogram("HistogramStaticInvalidBuckets", &[123.0, -234.0]),
            Err(Error::InvalidBuckets(_))
        ));
        assert!(matches!(
            registry.get_or_create_histogram("bad name", &[1.0]),
            Err(Error::Grammar(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_or_create_returns_same_instance() {
        let registry = Registry::new();
        let first = registry.get_or_create_histogram("same", &[1.0]).unwrap();
        for _ in 0..10 {
            let again = registry.get_or_create_histogram("same", &[1.0]).unwrap();
            assert!(Arc::ptr_eq(&first, &again));
        }
    }

    #[test]
    fn test_get_or_create_bucket_mismatch() {
        let registry = Registry::new();
        registry.get_or_create_histogram("shape", &[1.0]).unwrap();
        assert_eq!(
            registry.get_or_create_histogram("shape", &[1.0, 2.0]).unwrap_err(),
            Error::BucketMismatch {
                name: "shape".into()
            }
        );
    }

    #[test]
    fn test_unregister() {
        let registry = Registry::new();
        let h = registry.new_histogram("gone", &[1.0]).unwrap();
        assert!(registry.unregister("gone"));
        assert!(!registry.unregister("gone"));
        assert!(registry.get("gone").is_none());
        h.update(1.0);
        assert_eq!(registry.to_string(), "");
    }

    #[test]
    fn test_display_orders_by_name() {
        let registry = Registry::new();
        registry.new_histogram("b", &[]).unwrap();
        registry.new_histogram("a", &[]).unwrap();
        assert_eq!(registry.names(), ["a", "b"]);
        assert_eq!(
            registry.to_string(),
            "a_bucket{le=\"+Inf\"} 0\nb_bucket{le=\"+Inf\"} 0\n"
        );
    }
}
