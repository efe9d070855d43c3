// domain-batch-lib/tests/integration.rs

//! Integration tests for domain-batch-lib exports and the full pipeline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use domain_batch_lib::{
    estimate_count, generate, is_valid_label, partition, BatchConfig, BatchError, BatchRunner,
    Combinations, Dispatcher, PatternFilter, PositionSpec, QueryResult, RunHandle,
};

fn available(domain: String) -> QueryResult {
    QueryResult {
        domain,
        is_registered: false,
        data: Some(serde_json::json!({})),
        error: None,
    }
}

#[test]
fn test_generation_is_complete_and_ordered() {
    // Two digit positions: exactly the 100 two-digit strings, rightmost
    // position varying fastest
    let labels = generate(&[PositionSpec::Digit, PositionSpec::Digit], PatternFilter::None)
        .unwrap();
    assert_eq!(labels.len(), 100);
    assert_eq!(labels[0], "00");
    assert_eq!(labels[1], "01");
    assert_eq!(labels[10], "10");
    assert_eq!(labels[99], "99");
}

#[test]
fn test_generation_size_matches_branching_product() {
    let positions = vec![
        PositionSpec::Digit,
        PositionSpec::Letter,
        PositionSpec::Fixed("shop".to_string()),
    ];
    assert_eq!(estimate_count(&positions), 10 * 26);
    let labels = generate(&positions, PatternFilter::None).unwrap();
    assert_eq!(labels.len(), 260);
    assert!(labels.iter().all(|l| l.ends_with("shop")));
}

#[test]
fn test_filters_only_apply_to_all_digit_models() {
    // Same filter, letter position present: filter is skipped entirely
    let mixed = generate(
        &[PositionSpec::Letter, PositionSpec::Letter],
        PatternFilter::Aa,
    )
    .unwrap();
    assert_eq!(mixed.len(), 26 * 26);

    let digits = generate(
        &[PositionSpec::Digit, PositionSpec::Digit],
        PatternFilter::Aa,
    )
    .unwrap();
    assert_eq!(digits.len(), 10);
}

#[test]
fn test_named_filter_membership() {
    let cases: &[(PatternFilter, &str, bool)] = &[
        (PatternFilter::Aa, "1123", true),
        (PatternFilter::Aa, "1234", false),
        (PatternFilter::Abcba, "12321", true),
        (PatternFilter::Aabbcc, "112233", true),
        (PatternFilter::Aabbcc, "112234", false),
        (PatternFilter::Consecutive, "0123", true),
        (PatternFilter::Consecutive, "1357", false),
        (PatternFilter::Ab, "1212121", true),
        (PatternFilter::Ab, "1213121", false),
        (PatternFilter::Ab, "123", false),
        (PatternFilter::Abc, "123123", true),
    ];
    for (filter, input, expected) in cases {
        assert_eq!(
            filter.matches(input),
            *expected,
            "{} on '{}'",
            filter.as_str(),
            input
        );
    }
}

#[test]
fn test_lazy_combinations_stream() {
    let mut combos = Combinations::new(&[PositionSpec::Digit, PositionSpec::Letter]);
    assert_eq!(combos.size_hint(), (260, Some(260)));
    assert_eq!(combos.next().unwrap(), "0a");
    assert_eq!(combos.next().unwrap(), "0b");
    // Early termination: consume only part of the space
    assert_eq!(combos.nth(23).unwrap(), "0z");
    assert_eq!(combos.next().unwrap(), "1a");
}

#[test]
fn test_label_validation_boundaries() {
    assert!(is_valid_label("a"));
    assert!(is_valid_label(&"a".repeat(63)));
    assert!(!is_valid_label(&"a".repeat(64)));
    assert!(!is_valid_label(""));
    assert!(is_valid_label("a-b"));
    assert!(!is_valid_label("-ab"));
    assert!(!is_valid_label("ab-"));
}

#[test]
fn test_partition_shape() {
    // 10 candidates over 3 workers: first chunk gets the remainder
    let ranges = partition(10, 3);
    let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
    assert_eq!(sizes, vec![4, 3, 3]);
    assert_eq!(ranges[0], 0..4);
    assert_eq!(ranges[2], 7..10);
}

#[tokio::test]
async fn test_run_converges_to_completion() {
    let config = BatchConfig::new(vec![PositionSpec::Digit, PositionSpec::Digit], "com")
        .with_concurrency(7);
    let runner = BatchRunner::new(config);
    let handle = RunHandle::new();

    let summary = runner
        .run(
            |domain: String| async move { Ok(available(domain)) },
            &handle,
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.total, 100);
    assert_eq!(summary.completed, 100);
    assert_eq!(summary.results.len(), 100);
    assert!(summary.is_complete());
    assert!(!summary.stopped);
}

#[tokio::test]
async fn test_cancellation_keeps_partial_results() {
    // Single worker so completion order is deterministic; stop after the
    // first query finishes
    let handle = RunHandle::new();
    let stopper = handle.clone();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_query = calls.clone();

    let dispatcher = Dispatcher::new(1);
    let candidates: Vec<String> = (0..20).map(|i| format!("x{}.com", i)).collect();
    let summary = dispatcher
        .run(
            candidates,
            move |domain: String| {
                let stopper = stopper.clone();
                let calls = calls_in_query.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    stopper.stop();
                    Ok(available(domain))
                }
            },
            &handle,
            None,
        )
        .await;

    // The in-flight query completed and was recorded; nothing after it ran
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.results.len(), 1);
    assert_eq!(summary.results[0].domain, "x0.com");
    assert!(summary.stopped);
    assert!(!summary.is_complete());
}

#[tokio::test]
async fn test_failed_queries_are_recorded_not_dropped() {
    let config = BatchConfig::new(vec![PositionSpec::Digit], "com").with_concurrency(2);
    let runner = BatchRunner::new(config);
    let handle = RunHandle::new();

    let summary = runner
        .run(
            |domain: String| async move {
                if domain.starts_with('3') {
                    Err(BatchError::query(&domain, "proxy refused"))
                } else {
                    Ok(available(domain))
                }
            },
            &handle,
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.completed, 10);
    let failed: Vec<&QueryResult> = summary
        .results
        .iter()
        .filter(|r| r.error.is_some())
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].domain, "3.com");
    assert!(!failed[0].is_available());
}

#[tokio::test]
async fn test_per_query_timeout_contained_as_error() {
    let config = BatchConfig::new(vec![PositionSpec::Digit], "com")
        .with_concurrency(10)
        .with_query_timeout(Duration::from_millis(20));
    let runner = BatchRunner::new(config);
    let handle = RunHandle::new();

    let summary = runner
        .run(
            |domain: String| async move {
                if domain.starts_with('5') {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                Ok(available(domain))
            },
            &handle,
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.completed, 10);
    let timed_out = summary
        .results
        .iter()
        .find(|r| r.domain == "5.com")
        .unwrap();
    assert!(timed_out.error.is_some());
}

#[tokio::test]
async fn test_progress_reports_every_completion() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let config = BatchConfig::new(vec![PositionSpec::Digit], "com").with_concurrency(3);
    let runner = BatchRunner::new(config);
    let handle = RunHandle::new();

    let summary = runner
        .run(
            |domain: String| async move { Ok(available(domain)) },
            &handle,
            Some(tx),
        )
        .await
        .unwrap();
    assert_eq!(summary.completed, 10);

    let mut updates = Vec::new();
    while let Ok(p) = rx.try_recv() {
        updates.push(p);
    }
    assert_eq!(updates.len(), 10);
    assert!(updates.iter().all(|p| p.total == 10));
    // Completed counts are monotone in send order
    for pair in updates.windows(2) {
        assert!(pair[0].completed <= pair[1].completed);
    }
    assert_eq!(updates.last().unwrap().completed, 10);
}

#[test]
fn test_regeneration_is_idempotent() {
    let config = BatchConfig::new(
        vec![
            PositionSpec::Digit,
            PositionSpec::Digit,
            PositionSpec::Digit,
        ],
        "com",
    )
    .with_filter(PatternFilter::Aba);
    let runner = BatchRunner::new(config);
    assert_eq!(runner.candidates().unwrap(), runner.candidates().unwrap());
}

#[tokio::test]
async fn test_end_to_end_doubled_digit_batch() {
    let config = BatchConfig::new(vec![PositionSpec::Digit, PositionSpec::Digit], "com")
        .with_filter(PatternFilter::Aa)
        .with_concurrency(4);
    let runner = BatchRunner::new(config);

    let expected: Vec<String> = (0..10).map(|d| format!("{}{}.com", d, d)).collect();
    assert_eq!(runner.candidates().unwrap(), expected);

    let handle = RunHandle::new();
    let summary = runner
        .run(
            |domain: String| async move {
                // Pretend even leading digits are taken
                let taken = domain.as_bytes()[0] % 2 == 0;
                Ok(QueryResult {
                    domain,
                    is_registered: taken,
                    data: Some(serde_json::json!({})),
                    error: None,
                })
            },
            &handle,
            None,
        )
        .await
        .unwrap();

    assert!(summary.is_complete());
    let available_count = summary.results.iter().filter(|r| r.is_available()).count();
    assert_eq!(available_count, 5);
}
