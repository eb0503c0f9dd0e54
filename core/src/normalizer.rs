//! Row normalizer — typed order records with derived financials.
//!
//! Shape is checked once for the whole table before any row is read:
//! a missing column is fatal. Within a row, only the order date is
//! forgiving. An unparseable date becomes `OrderDate::Unknown` and the
//! window filter drops it later; a bad number aborts the batch.
//!
//! Derived fields, computed here and nowhere else:
//!   gross_revenue = price × quantity
//!   net_revenue   = gross_revenue − discount − refund
//!   cost          = quantity × cost_per_unit
//!   net_profit    = net_revenue − cost

use crate::{
    error::{AuditError, AuditResult},
    table::RawTable,
    types::{Amount, Sku, Timestamp},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "at", rename_all = "snake_case")]
pub enum OrderDate {
    Known(Timestamp),
    Unknown,
}

impl OrderDate {
    /// Parse free-form date text. Never fails: anything unrecognised,
    /// including an empty cell, is `Unknown`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return OrderDate::Unknown;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return OrderDate::Known(dt.naive_utc());
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
                return OrderDate::Known(dt);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
                return OrderDate::Known(d.and_time(NaiveTime::MIN));
            }
        }
        OrderDate::Unknown
    }

    pub fn known(self) -> Option<Timestamp> {
        match self {
            OrderDate::Known(ts) => Some(ts),
            OrderDate::Unknown   => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, OrderDate::Known(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Source line (header = line 1), kept for traceability.
    pub line:       usize,
    pub order_id:   String,
    pub sku:        Sku,
    pub price:      Amount,
    pub quantity:   u64,
    pub discount:   Amount,
    pub refund:     Amount,
    pub order_date: OrderDate,
    // Derived
    pub gross_revenue: Amount,
    pub net_revenue:   Amount,
    pub cost:          Amount,
    pub net_profit:    Amount,
}

impl OrderRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn derive(
        line: usize,
        order_id: String,
        sku: Sku,
        price: Amount,
        quantity: u64,
        discount: Amount,
        refund: Amount,
        order_date: OrderDate,
        cost_per_unit: Amount,
    ) -> Self {
        let units = quantity as f64;
        let gross_revenue = price * units;
        let net_revenue = gross_revenue - discount - refund;
        let cost = units * cost_per_unit;
        let net_profit = net_revenue - cost;

        Self {
            line,
            order_id,
            sku,
            price,
            quantity,
            discount,
            refund,
            order_date,
            gross_revenue,
            net_revenue,
            cost,
            net_profit,
        }
    }
}

/// Resolved positions of the required columns within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub order_id:   usize,
    pub sku:        usize,
    pub price:      usize,
    pub quantity:   usize,
    pub discount:   usize,
    pub refund:     usize,
    pub order_date: usize,
}

impl ColumnMap {
    /// Locate every required column, or report all the missing ones at once.
    pub fn resolve(table: &RawTable) -> AuditResult<Self> {
        let mut missing = Vec::new();
        let mut find = |name: &str| {
            table.column_index(name).unwrap_or_else(|| {
                missing.push(name.to_string());
                0
            })
        };

        let columns = Self {
            order_id:   find("order_id"),
            sku:        find("sku"),
            price:      find("price"),
            quantity:   find("quantity"),
            discount:   find("discount"),
            refund:     find("refund"),
            order_date: find("order_date"),
        };

        if missing.is_empty() {
            Ok(columns)
        } else {
            Err(AuditError::MissingColumns { columns: missing })
        }
    }
}

/// Normalize every row of `table`, applying one uniform `cost_per_unit`.
pub fn normalize(table: &RawTable, cost_per_unit: Amount) -> AuditResult<Vec<OrderRecord>> {
    let columns = ColumnMap::resolve(table)?;

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| normalize_row(row, RawTable::line_of(i), &columns, cost_per_unit))
        .collect::<AuditResult<Vec<_>>>()?;

    log::debug!(
        "normalizer: {} rows, {} with unknown order_date",
        records.len(),
        records.iter().filter(|r| !r.order_date.is_known()).count()
    );
    Ok(records)
}

fn normalize_row(
    row: &[String],
    line: usize,
    columns: &ColumnMap,
    cost_per_unit: Amount,
) -> AuditResult<OrderRecord> {
    let cell = |index: usize| row.get(index).map(|s| s.trim()).unwrap_or("");

    let price = parse_amount(cell(columns.price), "price", line)?;
    let quantity = parse_quantity(cell(columns.quantity), line)?;
    let discount = parse_amount(cell(columns.discount), "discount", line)?;
    let refund = parse_amount(cell(columns.refund), "refund", line)?;

    Ok(OrderRecord::derive(
        line,
        cell(columns.order_id).to_string(),
        // SKUs are grouping keys; keep the cell exactly as given.
        row.get(columns.sku).cloned().unwrap_or_default(),
        price,
        quantity,
        discount,
        refund,
        OrderDate::parse(cell(columns.order_date)),
        cost_per_unit,
    ))
}

fn parse_amount(text: &str, column: &str, line: usize) -> AuditResult<Amount> {
    let invalid = |reason: &str| AuditError::InvalidField {
        line,
        column: column.to_string(),
        value: text.to_string(),
        reason: reason.to_string(),
    };

    let value: f64 = text.parse().map_err(|_| invalid("not a number"))?;
    if !value.is_finite() {
        return Err(invalid("not a finite number"));
    }
    if value < 0.0 {
        return Err(invalid("must not be negative"));
    }
    Ok(value)
}

fn parse_quantity(text: &str, line: usize) -> AuditResult<u64> {
    let value = parse_amount(text, "quantity", line)?;
    if value.fract() != 0.0 || value >= u64::MAX as f64 {
        return Err(AuditError::InvalidField {
            line,
            column: "quantity".into(),
            value: text.to_string(),
            reason: "must be a whole number of units".into(),
        });
    }
    Ok(value as u64)
}
