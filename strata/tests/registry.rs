use std::sync::Arc;
use std::thread;

use strata::core::identifier;
use strata::{Error, Registry, Tags, load_from_str};

#[test]
fn test_get_or_create_concurrent() {
    let registry = Registry::new();
    let name = "GetOrCreateHistogramStaticConcurrent";

    let handles: Vec<_> = thread::scope(|s| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    (0..100)
                        .map(|_| registry.get_or_create_histogram(name, &[1.0]).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect()
    });

    assert_eq!(registry.len(), 1);
    let first = &handles[0];
    assert!(handles.iter().all(|h| Arc::ptr_eq(first, h)));
}

#[test]
fn test_per_tag_histograms() {
    #[derive(Tags)]
    struct Route {
        path: &'static str,
        method: &'static str,
    }

    let registry = Registry::new();
    let routes = [
        Route { path: "/foo", method: "GET" },
        Route { path: "/bar", method: "GET" },
        Route { path: "/foo", method: "GET" },
    ];
    for (i, route) in routes.iter().enumerate() {
        let name = identifier("response_size_bytes", route);
        let h = registry.get_or_create_histogram(&name, &[100.0]).unwrap();
        h.update(50.0 * (i + 1) as f64);
    }

    assert_eq!(
        registry.names(),
        [
            r#"response_size_bytes{path="/bar",method="GET"}"#,
            r#"response_size_bytes{path="/foo",method="GET"}"#,
        ]
    );
    assert_eq!(
        registry.to_string(),
        r#"response_size_bytes_bucket{path="/bar",method="GET",le="1.000e+02"} 1
response_size_bytes_bucket{path="/bar",method="GET",le="+Inf"} 1
response_size_bytes_sum{path="/bar",method="GET"} 100
response_size_bytes_count{path="/bar",method="GET"} 1
response_size_bytes_bucket{path="/foo",method="GET",le="1.000e+02"} 1
response_size_bytes_bucket{path="/foo",method="GET",le="+Inf"} 2
response_size_bytes_sum{path="/foo",method="GET"} 200
response_size_bytes_count{path="/foo",method="GET"} 2
"#
    );
}

#[test]
fn test_registry_from_config() {
    let cfg = load_from_str(
        r#"
version: 1
histograms:
  - name: 'request_duration_seconds{path="/api"}'
    buckets: { kind: default }
  - name: queue_depth
    buckets: { kind: linear, start: 0, width: 10, count: 3 }
"#,
    )
    .unwrap();

    let registry = Registry::from_config(&cfg).unwrap();
    assert_eq!(registry.len(), 2);

    let depth = registry.get("queue_depth").unwrap();
    assert_eq!(depth.bounds(), [0.0, 10.0, 20.0]);
    depth.update(0.0);
    depth.update(15.0);

    let dump = registry.to_string();
    assert!(dump.contains("queue_depth_bucket{le=\"0.000e+00\"} 1\n"));
    assert!(dump.contains("queue_depth_bucket{le=\"2.000e+01\"} 2\n"));
    assert!(dump.contains("queue_depth_sum 15\n"));
    assert!(dump.contains(
        "request_duration_seconds_bucket{path=\"/api\",le=\"5.000e-03\"} 0\n"
    ));

    // Declared histograms are create-or-fail: same shape is reused, another one is not.
    assert!(registry.get_or_create_histogram("queue_depth", &[0.0, 10.0, 20.0]).is_ok());
    assert_eq!(
        registry
            .get_or_create_histogram("queue_depth", &[1.0])
            .unwrap_err(),
        Error::BucketMismatch {
            name: "queue_depth".into()
        }
    );
}

#[test]
fn test_write_prometheus_matches_display() {
    let registry = Registry::new();
    registry.new_histogram("x", &[1.0]).unwrap().update(0.5);

    let mut out = Vec::new();
    registry.write_prometheus(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), registry.to_string());
}
