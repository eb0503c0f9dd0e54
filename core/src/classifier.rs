//! Leak classifier — decide what to do about a loss-making SKU.
//!
//! Rule, evaluated per aggregate:
//!   net_profit >= 0            -> no recommendation
//!   refunds >  discounts       -> Investigate refunds, recover = refunds
//!   refunds <= discounts       -> Reduce discounts,    recover = discounts
//!
//! Equal refunds and discounts resolve to `ReduceDiscounts`. Zero net
//! profit is break-even, not a leak.

use crate::{
    aggregator::SkuAggregate,
    types::{Amount, Sku},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeakAction {
    ReduceDiscounts,
    InvestigateRefunds,
}

impl LeakAction {
    pub fn label(self) -> &'static str {
        match self {
            LeakAction::ReduceDiscounts    => "Reduce discounts",
            LeakAction::InvestigateRefunds => "Investigate refunds",
        }
    }
}

impl fmt::Display for LeakAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub sku: Sku,
    /// Absolute value of the SKU's net profit.
    pub loss: Amount,
    pub action: LeakAction,
    pub estimated_recoverable: Amount,
}

pub fn classify(aggregate: &SkuAggregate) -> Option<Recommendation> {
    if !aggregate.is_loss() {
        return None;
    }

    let (action, estimated_recoverable) = if aggregate.refunds > aggregate.discounts {
        (LeakAction::InvestigateRefunds, aggregate.refunds)
    } else {
        (LeakAction::ReduceDiscounts, aggregate.discounts)
    };

    Some(Recommendation {
        sku: aggregate.sku.clone(),
        loss: aggregate.net_profit.abs(),
        action,
        estimated_recoverable,
    })
}
