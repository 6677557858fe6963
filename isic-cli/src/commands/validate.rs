//! Validate command implementation

use crate::config::load_scoring_config;
use crate::input::InputPaths;
use anyhow::Result;
use clap::Args;
use isic_engine::{Scorer, TableInput, TaskKind};
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Ground-truth CSV file
    #[arg(short, long, value_name = "CSV", required = true)]
    pub truth: PathBuf,

    /// Prediction CSV file
    #[arg(short, long, value_name = "CSV", required = true)]
    pub prediction: PathBuf,

    /// Scoring configuration file
    #[arg(short, long, value_name = "FILE", env = "ISIC_SCORE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating submission: {}", self.prediction.display());

        let config = load_scoring_config(self.config.as_deref(), Some(TaskKind::Classification))?;
        InputPaths::new(&self.truth, &self.prediction).check(TaskKind::Classification)?;
        let scorer = Scorer::new(config)?;

        match scorer.validate_tables(
            TableInput::from_file(&self.truth),
            TableInput::from_file(&self.prediction),
        ) {
            Ok(rows) => {
                println!("✓ Submission is valid!");
                println!("  Images: {rows}");
                println!("  Categories: {}", scorer.config().classification.categories.len());
                Ok(())
            }
            Err(e) => {
                println!("✗ Submission is invalid!");
                Err(e.into())
            }
        }
    }
}
