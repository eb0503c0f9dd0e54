//! Window filter — keep the trailing N days of orders.
//!
//! The window ends at the latest *known* order date in the dataset, not
//! at wall-clock time. cutoff = latest − window_days, inclusive.
//! Orders with an unknown date can never satisfy `date >= cutoff` and
//! are dropped. Relative order of the survivors is preserved.

use crate::{
    config::AuditWindow,
    normalizer::OrderRecord,
    types::Timestamp,
};

#[derive(Debug, Clone, PartialEq)]
pub struct WindowedOrders {
    pub window:        AuditWindow,
    /// Latest known order date, if any row had one.
    pub latest:        Option<Timestamp>,
    pub cutoff:        Option<Timestamp>,
    pub input_count:   usize,
    pub unknown_dates: usize,
    pub records:       Vec<OrderRecord>,
}

impl WindowedOrders {
    /// False when no row had a usable date; the window is then empty by
    /// construction rather than because the orders were old.
    pub fn has_known_dates(&self) -> bool {
        self.latest.is_some()
    }

    /// Rows dropped because they fell before the cutoff.
    pub fn out_of_window(&self) -> usize {
        self.input_count - self.unknown_dates - self.records.len()
    }
}

pub fn apply_window(records: Vec<OrderRecord>, window: AuditWindow) -> WindowedOrders {
    let input_count = records.len();
    let unknown_dates = records.iter().filter(|r| !r.order_date.is_known()).count();
    let latest = records.iter().filter_map(|r| r.order_date.known()).max();

    let Some(latest) = latest else {
        log::warn!(
            "window: none of {input_count} orders has a readable order_date; nothing to audit"
        );
        return WindowedOrders {
            window,
            latest: None,
            cutoff: None,
            input_count,
            unknown_dates,
            records: Vec::new(),
        };
    };

    let cutoff = latest - window.duration();
    let retained: Vec<OrderRecord> = records
        .into_iter()
        .filter(|r| r.order_date.known().is_some_and(|ts| ts >= cutoff))
        .collect();

    log::debug!(
        "window: {}d cutoff={cutoff} latest={latest} kept {}/{input_count} ({unknown_dates} unknown dates)",
        window.days(),
        retained.len(),
    );

    WindowedOrders {
        window,
        latest: Some(latest),
        cutoff: Some(cutoff),
        input_count,
        unknown_dates,
        records: retained,
    }
}
