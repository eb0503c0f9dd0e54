//! leak-audit: command-line profit leak detector.
//!
//! Usage:
//!   leak-audit --input orders.csv --window 30 --cost-per-unit 300
//!   leak-audit --input orders.csv --config audit.json --json
//!   leak-audit --write-sample sample_profit_leak_data.csv

use anyhow::{Context, Result};
use profit_leak_core::{
    config::{AuditConfig, AuditWindow},
    engine::AuditEngine,
    loader::{self, SAMPLE_CSV, SAMPLE_FILE_NAME},
    report::{AuditOutcome, Report},
    types::{Amount, REQUIRED_COLUMNS},
};
use chrono::NaiveDateTime;
use std::env;

const CURRENCY: &str = "₹";

#[derive(serde::Serialize)]
struct AuditOutput<'a> {
    input: &'a str,
    version: &'static str,
    report: &'a Report,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if let Some(path) = flag_value(&args, "--write-sample") {
        loader::write_sample(path).with_context(|| format!("writing sample to {path}"))?;
        println!("Sample CSV written to {path}");
        return Ok(());
    }

    let Some(input) = flag_value(&args, "--input") else {
        print_getting_started();
        return Ok(());
    };

    let config = build_config(&args)?;
    let json = args.iter().any(|a| a == "--json");
    log::info!(
        "auditing {input}: window={}d cost_per_unit={}",
        config.window.days(),
        config.cost_per_unit
    );

    let table = loader::load_table_file(input).with_context(|| format!("loading {input}"))?;
    let report = AuditEngine::new(config)
        .run(&table)
        .with_context(|| format!("auditing {input}"))?;

    if json {
        let output = AuditOutput {
            input,
            version: env!("CARGO_PKG_VERSION"),
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Config file (if any) first, then command-line overrides.
fn build_config(args: &[String]) -> Result<AuditConfig> {
    let base = match flag_value(args, "--config") {
        Some(path) => AuditConfig::load(path).with_context(|| format!("loading config {path}"))?,
        None => AuditConfig::default(),
    };

    let window = match flag_value(args, "--window") {
        Some(raw) => {
            let days: u32 = raw
                .parse()
                .with_context(|| format!("--window expects a number of days, got {raw:?}"))?;
            AuditWindow::try_from(days)?
        }
        None => base.window,
    };

    let cost_per_unit = match flag_value(args, "--cost-per-unit") {
        Some(raw) => raw
            .parse::<Amount>()
            .with_context(|| format!("--cost-per-unit expects an amount, got {raw:?}"))?,
        None => base.cost_per_unit,
    };

    Ok(AuditConfig::with_window(window, cost_per_unit)?)
}

fn print_getting_started() {
    println!("Profit Leak Detector");
    println!("Find which products are silently losing you money, and what to fix first.");
    println!();
    println!("Pass --input <orders.csv> to begin the audit.");
    println!("Required columns: {}", REQUIRED_COLUMNS.join(", "));
    println!();
    println!("=== SAMPLE CSV FORMAT ===");
    print!("{SAMPLE_CSV}");
    println!();
    println!("Save it with: leak-audit --write-sample {SAMPLE_FILE_NAME}");
}

fn print_report(report: &Report) {
    let c = &report.confidence;

    println!("=== AUDIT WINDOW ===");
    println!("  period:         last {} days", report.window_days);
    if let (Some(latest), Some(cutoff)) = (c.latest_order_date, c.cutoff) {
        println!("  from:           {}", fmt_date(cutoff));
        println!("  to:             {}", fmt_date(latest));
    }

    println!();
    println!("=== DATA CONFIDENCE ===");
    println!("  orders analyzed: {}", c.orders_analyzed);
    println!("  unique SKUs:     {}", c.unique_skus);
    if c.unknown_dates > 0 {
        println!("  unreadable dates skipped: {} of {} rows", c.unknown_dates, c.input_rows);
    }

    println!();
    println!("=== COST ASSUMPTION ===");
    println!(
        "  average cost per unit: {CURRENCY}{}",
        fmt_amount(report.cost_per_unit)
    );
    println!("  (approximate average; exact per-product costing is not required)");

    println!();
    println!("=== NET PROFIT BY PRODUCT (SKU) ===");
    if report.aggregates.is_empty() {
        println!("  (no orders in window)");
    } else {
        print_sku_table(report);
    }

    println!();
    println!("=== PROFIT LEAK ALERTS & DECISIONS ===");
    match report.outcome {
        AuditOutcome::InsufficientData => {
            println!("  Not enough data: no orders fall inside the audit window.");
            println!("  Check the order_date column or pick a longer window.");
        }
        AuditOutcome::NoLeaksDetected => {
            println!("  No profit leaks detected.");
        }
        AuditOutcome::LeaksDetected => {
            for rec in &report.recommendations {
                println!(
                    "  SKU {} is losing {CURRENCY}{}",
                    rec.sku,
                    fmt_amount(rec.loss)
                );
                println!("    -> Recommended action: {}", rec.action);
                println!(
                    "       Potential save: {CURRENCY}{}",
                    fmt_amount(rec.estimated_recoverable)
                );
            }
        }
    }

    println!();
    println!("Your data is processed in-session only. Nothing is stored.");
}

fn print_sku_table(report: &Report) {
    let sku_width = report
        .aggregates
        .iter()
        .map(|a| a.sku.chars().count())
        .max()
        .unwrap_or(0)
        .max(3);

    println!(
        "  {:<sku_width$}  {:>14}  {:>12}  {:>12}  {:>12}  {:>14}",
        "SKU", "gross_revenue", "discounts", "refunds", "total_cost", "net_profit"
    );
    for a in &report.aggregates {
        println!(
            "  {:<sku_width$}  {:>14}  {:>12}  {:>12}  {:>12}  {:>14}",
            a.sku,
            fmt_amount(a.gross_revenue),
            fmt_amount(a.discounts),
            fmt_amount(a.refunds),
            fmt_amount(a.total_cost),
            fmt_amount(a.net_profit),
        );
    }
}

fn fmt_date(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Whole-currency amount with thousands separators: 4202.4 -> "4,202".
/// Halves round to even: 2.5 -> "2".
fn fmt_amount(value: Amount) -> String {
    let formatted = format!("{value:.0}");
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some("0") => ("", "0"),
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
