//! Generate config command implementation

use super::TaskArg;
use crate::config::config_template;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Task the template is for
    #[arg(long, value_enum, default_value = "classification")]
    pub task: TaskArg,

    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating scoring configuration template...");
        println!("  Task: {:?}", self.task);
        println!("  Output file: {}", self.output.display());

        let template = config_template(self.task.into())?;
        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the categories, thresholds and subsets as needed");
        println!("2. Score a submission with it:");
        println!(
            "   isic-score score -t truth -p prediction --config {}",
            self.output.display()
        );

        Ok(())
    }
}
