//! Report assembler — the single value handed to presentation.
//!
//! "Nothing to show" has two distinct meanings and they never collapse:
//!   - `InsufficientData`: no order survived the window, so no verdict.
//!   - `NoLeaksDetected`:  SKUs were audited and none lost money.

use crate::{
    aggregator::SkuAggregate,
    classifier::{classify, Recommendation},
    config::AuditConfig,
    types::{Amount, Timestamp},
    window::WindowedOrders,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    LeaksDetected,
    NoLeaksDetected,
    InsufficientData,
}

/// How much of the dataset the verdict rests on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfidence {
    pub orders_analyzed:   usize,
    pub unique_skus:       usize,
    pub input_rows:        usize,
    pub unknown_dates:     usize,
    pub latest_order_date: Option<Timestamp>,
    pub cutoff:            Option<Timestamp>,
}

impl DataConfidence {
    pub fn from_window(windowed: &WindowedOrders, unique_skus: usize) -> Self {
        Self {
            orders_analyzed:   windowed.records.len(),
            unique_skus,
            input_rows:        windowed.input_count,
            unknown_dates:     windowed.unknown_dates,
            latest_order_date: windowed.latest,
            cutoff:            windowed.cutoff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub window_days:     u32,
    pub cost_per_unit:   Amount,
    pub confidence:      DataConfidence,
    pub aggregates:      Vec<SkuAggregate>,
    pub recommendations: Vec<Recommendation>,
    pub outcome:         AuditOutcome,
}

impl Report {
    /// Classify every aggregate in order and wrap the results.
    /// `aggregates` must already be in presentation order.
    pub fn assemble(
        aggregates: Vec<SkuAggregate>,
        confidence: DataConfidence,
        config: &AuditConfig,
    ) -> Self {
        let recommendations: Vec<Recommendation> =
            aggregates.iter().filter_map(classify).collect();

        let outcome = if confidence.orders_analyzed == 0 {
            AuditOutcome::InsufficientData
        } else if recommendations.is_empty() {
            AuditOutcome::NoLeaksDetected
        } else {
            AuditOutcome::LeaksDetected
        };

        Self {
            window_days: config.window.days(),
            cost_per_unit: config.cost_per_unit,
            confidence,
            aggregates,
            recommendations,
            outcome,
        }
    }

    pub fn no_leaks_detected(&self) -> bool {
        self.outcome == AuditOutcome::NoLeaksDetected
    }

    pub fn insufficient_data(&self) -> bool {
        self.outcome == AuditOutcome::InsufficientData
    }

    /// Sum of losses across all leaking SKUs.
    pub fn total_loss(&self) -> Amount {
        self.recommendations.iter().map(|r| r.loss).sum()
    }

    pub fn total_recoverable(&self) -> Amount {
        self.recommendations.iter().map(|r| r.estimated_recoverable).sum()
    }

    pub fn total_net_profit(&self) -> Amount {
        self.aggregates.iter().map(|a| a.net_profit).sum()
    }

    pub fn to_json_pretty(&self) -> crate::error::AuditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
