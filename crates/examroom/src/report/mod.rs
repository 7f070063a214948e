//! Downloadable CSV sheets rendered from allocation output. One row per
//! assignment; rows whose cross-references cannot be resolved are skipped
//! with a diagnostic rather than aborting the whole sheet.

pub mod duty_sheet;
pub mod seating_chart;

pub use duty_sheet::write_duty_sheet;
pub use seating_chart::write_seating_chart;

/// Error raised while rendering a sheet.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("export io failed: {0}")]
    Io(#[from] std::io::Error),
}
