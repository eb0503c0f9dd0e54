//! Shared primitive types used across the audit pipeline.

use chrono::NaiveDateTime;

/// Product identifier. Compared byte-for-byte: no trimming, no case folding.
pub type Sku = String;

/// A monetary amount in the dataset's single currency.
pub type Amount = f64;

/// Calendar timestamp of an order (timezone-naive, UTC when an offset was given).
pub type Timestamp = NaiveDateTime;

/// Columns every input table must carry, in the canonical export order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "order_id",
    "sku",
    "price",
    "quantity",
    "discount",
    "refund",
    "order_date",
];
