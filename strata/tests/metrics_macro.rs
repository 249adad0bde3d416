use strata::{HistogramStatic, exponential_buckets, metrics};

#[test]
fn test_field_name_and_prefix() {
    #[metrics(prefix = "myapp")]
    struct TestMetrics {
        #[histogram(buckets = [1.0, 2.0])]
        latency: HistogramStatic,
    }

    let m = TestMetrics::new().unwrap();
    assert_eq!(m.latency.name(), "myapp_latency");
    assert_eq!(
        m.to_string(),
        "myapp_latency_bucket{le=\"1.000e+00\"} 0\n\
         myapp_latency_bucket{le=\"2.000e+00\"} 0\n\
         myapp_latency_bucket{le=\"+Inf\"} 0\n"
    );
}

#[test]
fn test_name_override_with_tags() {
    #[metrics]
    struct TestMetrics {
        #[histogram(name = r#"m{foo="bar"}"#, buckets = [100.0])]
        field: HistogramStatic,
    }

    let m = TestMetrics::new().unwrap();
    m.field.update(99.0);
    m.field.update(101.0);

    assert_eq!(
        m.to_string(),
        "m_bucket{foo=\"bar\",le=\"1.000e+02\"} 1\n\
         m_bucket{foo=\"bar\",le=\"+Inf\"} 2\n\
         m_sum{foo=\"bar\"} 200\n\
         m_count{foo=\"bar\"} 2\n"
    );
}

#[test]
fn test_default_buckets() {
    #[metrics]
    struct TestMetrics {
        #[histogram]
        response_time: HistogramStatic,
    }

    let m = TestMetrics::new().unwrap();
    assert_eq!(m.response_time.bounds(), strata::DEFAULT_BUCKETS);
}

#[test]
fn test_fields_render_in_declaration_order() {
    #[metrics(prefix = "svc")]
    struct TestMetrics {
        #[histogram(buckets = exponential_buckets(1.0, 10.0, 2)?)]
        zeta: HistogramStatic,
        #[histogram(buckets = [])]
        alpha: HistogramStatic,
    }

    let m = TestMetrics::new().unwrap();
    m.alpha.update(5.0);

    let output = m.to_string();
    let zeta = output.find("svc_zeta_bucket").unwrap();
    let alpha = output.find("svc_alpha_bucket").unwrap();
    assert!(zeta < alpha);
    assert!(output.contains("svc_zeta_bucket{le=\"1.000e+01\"} 0\n"));
    assert!(output.contains("svc_alpha_sum 5\nsvc_alpha_count 1\n"));
    assert!(!output.contains("svc_zeta_sum"));
}

#[test]
fn test_invalid_buckets_surface_from_new() {
    #[metrics]
    struct TestMetrics {
        #[histogram(buckets = [2.0, 1.0])]
        unsorted: HistogramStatic,
    }

    assert!(matches!(
        TestMetrics::new(),
        Err(strata::Error::InvalidBuckets(_))
    ));
}

#[test]
fn test_generator_error_surfaces_from_new() {
    #[metrics]
    struct TestMetrics {
        #[histogram(buckets = exponential_buckets(0.0, 2.0, 3)?)]
        sizes: HistogramStatic,
    }

    assert!(matches!(
        TestMetrics::new(),
        Err(strata::Error::InvalidParameter(_))
    ));
}
