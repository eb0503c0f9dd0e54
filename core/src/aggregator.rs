//! SKU aggregator — per-product totals over the windowed orders.
//!
//! Grouping key is the SKU string exactly as it appears in the data.
//! "SKU_A", "sku_a" and "SKU_A " are three different products; callers
//! that want folding must clean the data first.
//!
//! Output order: net_profit ascending (worst loss first), ties broken by
//! SKU ascending so the table is deterministic.

use crate::{
    normalizer::OrderRecord,
    types::{Amount, Sku},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuAggregate {
    pub sku: Sku,
    pub orders: usize,
    /// Saturates at `u64::MAX` rather than wrapping.
    pub units: u64,
    pub gross_revenue: Amount,
    pub discounts: Amount,
    pub refunds: Amount,
    pub total_cost: Amount,
    pub net_profit: Amount,
}

impl SkuAggregate {
    pub fn zero(sku: &str) -> Self {
        Self {
            sku: sku.to_string(),
            orders: 0,
            units: 0,
            gross_revenue: 0.0,
            discounts: 0.0,
            refunds: 0.0,
            total_cost: 0.0,
            net_profit: 0.0,
        }
    }

    fn add(&mut self, record: &OrderRecord) {
        self.orders += 1;
        self.units = self.units.saturating_add(record.quantity);
        self.gross_revenue += record.gross_revenue;
        self.discounts += record.discount;
        self.refunds += record.refund;
        self.total_cost += record.cost;
        self.net_profit += record.net_profit;
    }

    pub fn is_loss(&self) -> bool {
        self.net_profit < 0.0
    }
}

pub fn aggregate(records: &[OrderRecord]) -> Vec<SkuAggregate> {
    let mut by_sku: HashMap<&str, SkuAggregate> = HashMap::new();
    for record in records {
        by_sku
            .entry(record.sku.as_str())
            .or_insert_with(|| SkuAggregate::zero(&record.sku))
            .add(record);
    }

    let mut result: Vec<SkuAggregate> = by_sku.into_values().collect();
    result.sort_by(|a, b| {
        a.net_profit
            .total_cmp(&b.net_profit)
            .then_with(|| a.sku.cmp(&b.sku))
    });

    log::debug!(
        "aggregator: {} orders -> {} SKUs",
        records.len(),
        result.len()
    );
    result
}
