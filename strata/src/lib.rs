//! # Strata
//!
//! Concurrency-safe histograms with statically declared buckets, exported in
//! the Prometheus text format.
//!
//! ## Quick Start
//!
//! ```
//! use strata::HistogramStatic;
//!
//! let latency = HistogramStatic::new(
//!     r#"request_duration_seconds{path="/api"}"#,
//!     &[0.1, 0.5, 1.0],
//! )
//! .expect("valid histogram");
//!
//! latency.update(0.25);
//! latency.update(0.75);
//! latency.update(3.0);
//!
//! let mut out = String::new();
//! latency.write_to(&mut out).unwrap();
//! print!("{out}");
//! ```
//!
//! This outputs:
//! ```text
//! request_duration_seconds_bucket{path="/api",le="1.000e-01"} 0
//! request_duration_seconds_bucket{path="/api",le="5.000e-01"} 1
//! request_duration_seconds_bucket{path="/api",le="1.000e+00"} 2
//! request_duration_seconds_bucket{path="/api",le="+Inf"} 3
//! request_duration_seconds_sum{path="/api"} 4
//! request_duration_seconds_count{path="/api"} 3
//! ```
//!
//! Values equal to a bound count towards that bound's bucket. NaN and
//! negative values are dropped silently: recording never fails.
//!
//! ## Identifiers
//!
//! Names follow `name` or `name{tag="value",...}`, where names match
//! `[A-Za-z_:.][A-Za-z0-9_:.]*`. Constructors reject anything else.
//!
//! ## Generating Buckets
//!
//! ```
//! use strata::{exponential_buckets, exponential_buckets_range, linear_buckets};
//!
//! assert_eq!(linear_buckets(15.0, 5.0, 4).unwrap(), [15.0, 20.0, 25.0, 30.0]);
//! assert_eq!(exponential_buckets(100.0, 2.0, 3).unwrap(), [100.0, 200.0, 400.0]);
//! assert_eq!(exponential_buckets_range(1.0, 100.0, 3).unwrap().len(), 3);
//! ```
//!
//! ## Registries
//!
//! A [`Registry`] holds histograms by name and dumps all of them at once.
//! Combined with [`Tags`] it builds one histogram per tag value:
//!
//! ```
//! use strata::core::identifier;
//! use strata::{Registry, Tags};
//!
//! #[derive(Tags)]
//! struct Route<'a> {
//!     path: &'a str,
//! }
//!
//! let registry = Registry::new();
//! for path in ["/foo", "/bar", "/foo"] {
//!     let name = identifier("response_size_bytes", &Route { path });
//!     registry
//!         .get_or_create_histogram(&name, &[512.0, 4096.0])
//!         .unwrap()
//!         .update(1024.0);
//! }
//!
//! assert_eq!(registry.len(), 2);
//! let mut out = Vec::new();
//! registry.write_prometheus(&mut out).unwrap();
//! ```
//!
//! ## Declaring a Set of Histograms
//!
//! ```
//! use strata::{HistogramStatic, linear_buckets, metrics};
//!
//! #[metrics(prefix = "worker")]
//! struct WorkerMetrics {
//!     // Uses DEFAULT_BUCKETS.
//!     #[histogram]
//!     job_seconds: HistogramStatic,
//!
//!     #[histogram(name = r#"batch_size{queue="main"}"#, buckets = linear_buckets(8.0, 8.0, 4)?)]
//!     batch: HistogramStatic,
//! }
//!
//! let m = WorkerMetrics::new().unwrap();
//! m.batch.update(12.0);
//! assert!(m.to_string().contains(r#"worker_batch_size_bucket{queue="main",le="1.600e+01"} 1"#));
//! ```
//!
//! An identifier that breaks the grammar fails to compile:
//! ```compile_fail
//! use strata::{HistogramStatic, metrics};
//!
//! #[metrics]
//! struct Bad {
//!     #[histogram(name = "request latency")]
//!     latency: HistogramStatic,
//! }
//! ```

#[doc(hidden)]
pub use strata_macro::{Tags, metrics};

#[doc(hidden)]
pub use strata_core as core;

pub use strata_core::{
    DEFAULT_BUCKETS, Error, HistogramStatic, Registry, Result, Tags, exponential_buckets,
    exponential_buckets_range, linear_buckets,
};
pub use strata_core::config::{load_from_file, load_from_str};
