//! Plain text output formatter

use super::{format_value, ReportFormatter};
use anyhow::Result;
use isic_engine::TaskReport;
use std::io::Write;

/// Plain text formatter - the two score lines, then one line per metric
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportFormatter for TextFormatter<W> {
    fn write_report(&mut self, report: &TaskReport) -> Result<()> {
        writeln!(self.writer, "{}", report.score())?;
        for group in report.groups() {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", group.label)?;
            for metric in group.metrics {
                writeln!(
                    self.writer,
                    "  {}: {}",
                    metric.name,
                    format_value(metric.value)
                )?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
