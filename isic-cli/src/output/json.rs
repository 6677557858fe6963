//! JSON output formatter

use super::ReportFormatter;
use anyhow::Result;
use isic_engine::{MetricRecord, TaskReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter - score mapping plus every metric record
pub struct JsonFormatter<W: Write> {
    writer: W,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct ReportData<'a> {
    /// Task name
    pub task: &'static str,
    /// `overall` and `validation`
    pub score: BTreeMap<String, f64>,
    /// Category or image label to its metrics
    pub metrics: Vec<GroupData<'a>>,
}

/// Metrics of one category or image
#[derive(Debug, Serialize)]
pub struct GroupData<'a> {
    /// Category name or image identifier
    pub label: &'a str,
    /// Metric records; undefined values are `null`
    pub metrics: &'a [MetricRecord],
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportFormatter for JsonFormatter<W> {
    fn write_report(&mut self, report: &TaskReport) -> Result<()> {
        let data = ReportData {
            task: report.kind().as_str(),
            score: report.score().to_dict(),
            metrics: report
                .groups()
                .into_iter()
                .map(|group| GroupData {
                    label: group.label,
                    metrics: group.metrics,
                })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut self.writer, &data)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
