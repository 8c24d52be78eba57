//! Concrete adapter implementations for ports.

pub mod console_report;
pub mod csv_adapter;
pub mod csv_ledger;
pub mod file_config_adapter;
pub mod synthetic_adapter;
