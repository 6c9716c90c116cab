//! `loadcheck-recon` — before/after tabular reconciliation engine.
//!
//! Pure engine crate: receives in-memory tables, returns per-cell
//! classifications. No CLI or file-IO dependencies, no state across calls.

pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod normalize;
pub mod similar;
pub mod summary;

pub use config::CompareConfig;
pub use engine::{compare_tables, load_csv_table, reconcile, CompareOptions};
pub use error::ReconcileError;
pub use model::{CellClassification, CellOutcome, CellScalar, CompareReport, Table};
