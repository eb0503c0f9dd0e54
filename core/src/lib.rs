//! Profit leak audit core.
//!
//! Turns a table of e-commerce orders into a per-SKU profitability report
//! over a trailing window, and recommends a fix for every SKU that loses
//! money. See `engine` for the stage order.

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod normalizer;
pub mod report;
pub mod table;
pub mod types;
pub mod window;
