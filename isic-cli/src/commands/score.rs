//! Score command implementation

use super::{init_logging, TaskArg};
use crate::config::load_scoring_config;
use crate::error::CliError;
use crate::input::InputPaths;
use crate::output::{JsonFormatter, MarkdownFormatter, ReportFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use isic_engine::segmentation::scorable_masks;
use isic_engine::{EngineError, Scorer, TaskKind, TaskReport};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Arguments for the score command
#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Ground-truth CSV file or mask directory
    #[arg(short, long, value_name = "PATH", required = true)]
    pub truth: PathBuf,

    /// Prediction CSV file or mask directory
    #[arg(short, long, value_name = "PATH", required = true)]
    pub prediction: PathBuf,

    /// Scoring configuration file
    #[arg(short, long, value_name = "FILE", env = "ISIC_SCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Task to score (overrides the configuration file)
    #[arg(long, value_enum)]
    pub task: Option<TaskArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Score lines followed by one line per metric
    Text,
    /// Score mapping and metric records as JSON
    Json,
    /// Score list and metric table
    Markdown,
}

impl ScoreArgs {
    /// Execute the score command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        log::info!("Starting scoring");
        log::debug!("Arguments: {:?}", self);

        let config = load_scoring_config(self.config.as_deref(), self.task.map(Into::into))?;
        let task = config.task_kind();
        InputPaths::new(&self.truth, &self.prediction).check(task)?;

        let mut progress = ProgressReporter::new(self.quiet);
        if task == TaskKind::Segmentation {
            let total = scorable_masks(&self.truth, &config)
                .map(|masks| masks.len())
                .unwrap_or(0);
            progress.init_images(total as u64);
        }

        let scorer = Scorer::new(config).map_err(|e| CliError::ConfigError(e.to_string()))?;
        let result = scorer.score_with_progress(&self.truth, &self.prediction, |image| {
            progress.image_completed(image)
        });
        progress.finish();
        let report = result.map_err(scoring_error)?;

        log::info!(
            "Scored {} {} entries",
            report.groups().len(),
            report.kind()
        );
        self.write_report(&report)
    }

    fn write_report(&self, report: &TaskReport) -> Result<()> {
        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout()),
        };

        let mut formatter: Box<dyn ReportFormatter> = match self.format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };
        formatter.write_report(report)
    }
}

/// Surface scoring failures with their user-facing message only
fn scoring_error(err: EngineError) -> anyhow::Error {
    match err.as_score_error() {
        Some(score_error) => CliError::ScoringFailed(score_error.to_string()).into(),
        None => err.into(),
    }
}
