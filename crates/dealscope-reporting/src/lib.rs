//! Export formats for derived analysis reports.

pub mod export;

pub use export::{render, write_report, ExportError, ExportFormat};
