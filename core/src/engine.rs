//! The audit engine — runs one dataset through the pipeline.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Row normalizer   (shape check, typed rows, derived financials)
//!   2. Window filter    (trailing N days from the latest known date)
//!   3. SKU aggregator   (grouped totals, sorted worst loss first)
//!   4. Report assembler (leak classifier over every aggregate)
//!
//! RULES:
//!   - Each stage reads only the output of the stage before it.
//!   - No stage keeps state between runs; the engine holds config only.
//!   - Same table + same config = same report.

use crate::{
    aggregator::aggregate,
    config::AuditConfig,
    error::AuditResult,
    normalizer::{normalize, OrderRecord},
    report::{AuditOutcome, DataConfidence, Report},
    table::RawTable,
    window::apply_window,
};

#[derive(Debug, Clone)]
pub struct AuditEngine {
    pub config: AuditConfig,
}

impl AuditEngine {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn build_test() -> Self {
        Self::new(AuditConfig::default_test())
    }

    /// Full pipeline from a raw table. Fails only on input shape or a
    /// malformed numeric cell, before any report is produced.
    pub fn run(&self, table: &RawTable) -> AuditResult<Report> {
        let records = normalize(table, self.config.cost_per_unit)?;
        Ok(self.run_records(records))
    }

    /// Pipeline from already-normalized records (stages 2–4).
    pub fn run_records(&self, records: Vec<OrderRecord>) -> Report {
        let windowed = apply_window(records, self.config.window);
        let aggregates = aggregate(&windowed.records);
        let confidence = DataConfidence::from_window(&windowed, aggregates.len());
        let report = Report::assemble(aggregates, confidence, &self.config);

        log_outcome(&report);
        report
    }
}

fn log_outcome(report: &Report) {
    let c = &report.confidence;
    match report.outcome {
        AuditOutcome::InsufficientData => {
            log::warn!(
                "audit {}d: no orders in window ({} rows in, {} unknown dates)",
                report.window_days,
                c.input_rows,
                c.unknown_dates
            );
        }
        AuditOutcome::NoLeaksDetected => {
            log::info!(
                "audit {}d: {} orders, {} SKUs, no leaks, net profit {:.0}",
                report.window_days,
                c.orders_analyzed,
                c.unique_skus,
                report.total_net_profit()
            );
        }
        AuditOutcome::LeaksDetected => {
            log::info!(
                "audit {}d: {} orders, {} SKUs, {} leaking, loss {:.0}, recoverable {:.0}",
                report.window_days,
                c.orders_analyzed,
                c.unique_skus,
                report.recommendations.len(),
                report.total_loss(),
                report.total_recoverable()
            );
            for rec in &report.recommendations {
                log::warn!(
                    "leak {}: losing {:.0} -> {} (save {:.0})",
                    rec.sku,
                    rec.loss,
                    rec.action,
                    rec.estimated_recoverable
                );
            }
        }
    }
}
