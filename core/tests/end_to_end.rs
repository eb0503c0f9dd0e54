//! Full pipeline tests on the sample orders file.

use profit_leak_core::{
    classifier::LeakAction,
    config::AuditConfig,
    engine::AuditEngine,
    loader::{load_table, SAMPLE_CSV},
    report::{AuditOutcome, Report},
    table::RawTable,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn sample() -> RawTable {
    load_table(SAMPLE_CSV.as_bytes()).unwrap()
}

fn audit(table: &RawTable, window_days: u32, cost_per_unit: f64) -> Report {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = AuditConfig::new(window_days, cost_per_unit).unwrap();
    AuditEngine::new(config).run(table).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Cost 300, 90 days: both SKUs profitable, SKU_B (696) ahead of SKU_A (898).
#[test]
fn sample_at_300_has_no_leaks() {
    let report = audit(&sample(), 90, 300.0);

    assert_eq!(report.aggregates.len(), 2);
    let b = &report.aggregates[0];
    let a = &report.aggregates[1];

    assert_eq!(b.sku, "SKU_B");
    assert!(close(b.gross_revenue, 1996.0));
    assert!(close(b.discounts, 100.0));
    assert!(close(b.refunds, 0.0));
    assert!(close(b.total_cost, 1200.0));
    assert!(close(b.net_profit, 696.0));

    assert_eq!(a.sku, "SKU_A");
    assert!(close(a.gross_revenue, 2997.0));
    assert!(close(a.discounts, 200.0));
    assert!(close(a.refunds, 999.0));
    assert!(close(a.total_cost, 900.0));
    assert!(close(a.net_profit, 898.0));

    assert!(report.recommendations.is_empty());
    assert_eq!(report.outcome, AuditOutcome::NoLeaksDetected);
    assert!(report.no_leaks_detected());
    assert_eq!(report.confidence.orders_analyzed, 5);
    assert_eq!(report.confidence.unique_skus, 2);
}

/// Cost 2000: both SKUs leak. SKU_B (−6104) is worse than SKU_A (−4202).
#[test]
fn sample_at_2000_flags_both_skus() {
    let report = audit(&sample(), 90, 2000.0);

    assert_eq!(report.outcome, AuditOutcome::LeaksDetected);
    assert!(!report.no_leaks_detected());
    assert_eq!(report.recommendations.len(), 2);

    let b = &report.recommendations[0];
    assert_eq!(b.sku, "SKU_B");
    assert!(close(b.loss, 6104.0));
    assert_eq!(b.action, LeakAction::ReduceDiscounts);
    assert!(close(b.estimated_recoverable, 100.0));

    let a = &report.recommendations[1];
    assert_eq!(a.sku, "SKU_A");
    assert!(close(a.loss, 4202.0));
    assert_eq!(a.action, LeakAction::InvestigateRefunds);
    assert!(close(a.estimated_recoverable, 999.0));

    assert!(close(report.total_loss(), 10306.0));
    assert!(close(report.total_recoverable(), 1099.0));
}

/// Recommendations follow aggregate order and skip profitable SKUs.
#[test]
fn recommendations_follow_aggregate_order() {
    // cost 500:  SKU_A 1798 − 1500 = +298;  SKU_B 1896 − 2000 = −104.
    let report = audit(&sample(), 90, 500.0);

    let agg_skus: Vec<&str> = report.aggregates.iter().map(|a| a.sku.as_str()).collect();
    assert_eq!(agg_skus, ["SKU_B", "SKU_A"]);
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].sku, "SKU_B");
    assert!(close(report.recommendations[0].loss, 104.0));
}

/// All sample orders sit within the last 7 days of 2025-06-05.
#[test]
fn seven_day_window_keeps_whole_sample() {
    let report = audit(&sample(), 7, 300.0);

    assert_eq!(report.window_days, 7);
    assert_eq!(report.confidence.orders_analyzed, 5);
    let cutoff = report.confidence.cutoff.unwrap();
    assert_eq!(cutoff.format("%Y-%m-%d").to_string(), "2025-05-29");
}

/// No readable dates: insufficient data, distinct from "no leaks".
#[test]
fn unreadable_dates_give_insufficient_data() {
    let table = RawTable::from_rows(
        &["order_id", "sku", "price", "quantity", "discount", "refund", "order_date"],
        &[
            &["1", "A", "10", "1", "0", "0", "n/a"],
            &["2", "B", "10", "1", "0", "0", ""],
        ],
    );

    let report = audit(&table, 30, 300.0);

    assert_eq!(report.outcome, AuditOutcome::InsufficientData);
    assert!(report.insufficient_data());
    assert!(!report.no_leaks_detected());
    assert!(report.aggregates.is_empty());
    assert!(report.recommendations.is_empty());
    assert_eq!(report.confidence.orders_analyzed, 0);
    assert_eq!(report.confidence.unknown_dates, 2);
    assert_eq!(report.confidence.input_rows, 2);
}

/// A header-only file is also insufficient data, not an error.
#[test]
fn empty_file_gives_insufficient_data() {
    let table = load_table("order_id,sku,price,quantity,discount,refund,order_date\n".as_bytes())
        .unwrap();

    let report = audit(&table, 7, 300.0);

    assert_eq!(report.outcome, AuditOutcome::InsufficientData);
}

/// Missing columns stop the run before any report exists.
#[test]
fn missing_column_fails_the_run() {
    let table = load_table("order_id,sku,price,quantity\n1,A,10,1\n".as_bytes()).unwrap();

    let err = AuditEngine::build_test().run(&table).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("discount"), "{message}");
    assert!(message.contains("refund"), "{message}");
    assert!(message.contains("order_date"), "{message}");
}

/// Running twice on the same input gives the same report.
#[test]
fn runs_are_repeatable() {
    let engine = AuditEngine::new(AuditConfig::new(30, 2000.0).unwrap());
    let table = sample();

    assert_eq!(engine.run(&table).unwrap(), engine.run(&table).unwrap());
}

/// The report serializes with the outcome and actions in snake_case.
#[test]
fn report_serializes_to_json() {
    let report = audit(&sample(), 90, 2000.0);

    let json = report.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["outcome"], "leaks_detected");
    assert_eq!(value["window_days"], 90);
    assert_eq!(value["recommendations"][1]["action"], "investigate_refunds");
    assert_eq!(value["aggregates"][0]["sku"], "SKU_B");

    let back: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
