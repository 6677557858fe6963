//! Markdown output formatter

use super::{format_value, ReportFormatter};
use anyhow::Result;
use isic_core::score::format_float;
use isic_engine::TaskReport;
use std::io::Write;

/// Markdown formatter - score list followed by a metric table
pub struct MarkdownFormatter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportFormatter for MarkdownFormatter<W> {
    fn write_report(&mut self, report: &TaskReport) -> Result<()> {
        let score = report.score();
        writeln!(self.writer, "# {} score", report.kind())?;
        writeln!(self.writer)?;
        writeln!(self.writer, "- **Overall:** {}", format_float(score.overall))?;
        writeln!(
            self.writer,
            "- **Validation:** {}",
            format_float(score.validation)
        )?;

        let groups = report.groups();
        let Some(first) = groups.first() else {
            self.writer.flush()?;
            return Ok(());
        };

        let label_header = match report.kind() {
            isic_engine::TaskKind::Classification => "Category",
            isic_engine::TaskKind::Segmentation => "Image",
        };
        let names: Vec<&str> = first.metrics.iter().map(|m| m.name.as_str()).collect();

        writeln!(self.writer)?;
        writeln!(self.writer, "| {} | {} |", label_header, names.join(" | "))?;
        writeln!(self.writer, "|---|{}", "---|".repeat(names.len()))?;
        for group in &groups {
            let values: Vec<String> = group
                .metrics
                .iter()
                .map(|m| format_value(m.value))
                .collect();
            writeln!(self.writer, "| {} | {} |", group.label, values.join(" | "))?;
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total scored: {}*", groups.len())?;
        self.writer.flush()?;
        Ok(())
    }
}
