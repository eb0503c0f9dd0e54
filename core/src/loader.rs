//! CSV order loader.
//!
//! Reads an orders export into a `RawTable`. Only headers are trimmed;
//! cells are kept verbatim so SKUs differing by whitespace stay distinct.
//! Column order does not matter and extra columns are carried along untouched.
//! Expected columns:
//!   order_id, sku, price, quantity, discount, refund, order_date

use crate::{error::AuditResult, table::RawTable};
use std::io::Read;

pub const SAMPLE_FILE_NAME: &str = "sample_profit_leak_data.csv";

/// Five-order sample in the expected format.
pub const SAMPLE_CSV: &str = "\
order_id,sku,price,quantity,discount,refund,order_date
1001,SKU_A,999,1,0,0,2025-06-01
1002,SKU_A,999,1,200,0,2025-06-02
1003,SKU_A,999,1,0,999,2025-06-03
1004,SKU_B,499,2,100,0,2025-06-04
1005,SKU_B,499,2,0,0,2025-06-05
";

/// Load an order table from any CSV reader.
pub fn load_table<R: Read>(reader: R) -> AuditResult<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Load an order table from a CSV file path.
pub fn load_table_file(path: &str) -> AuditResult<RawTable> {
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open '{path}': {e}"))?;
    load_table(file)
}

/// Write the sample CSV to `path`.
pub fn write_sample(path: &str) -> AuditResult<()> {
    std::fs::write(path, SAMPLE_CSV)?;
    Ok(())
}
