//! Output formatting module

use anyhow::Result;
use isic_core::score::format_float;
use isic_engine::TaskReport;

/// Trait for report formatters
pub trait ReportFormatter {
    /// Write a complete report
    fn write_report(&mut self, report: &TaskReport) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Render an optional metric value; undefined values print as `None`
pub fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "None".to_string(), format_float)
}
