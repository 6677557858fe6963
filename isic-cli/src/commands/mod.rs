//! CLI command implementations

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use isic_engine::TaskKind;

pub mod generate_config;
pub mod score;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score a prediction against ground truth
    Score(score::ScoreArgs),

    /// Check a classification submission without scoring it
    Validate(validate::ValidateArgs),

    /// Write a scoring configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List the default classification categories
    Categories,

    /// List available output formats
    Formats,
}

/// Task selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskArg {
    /// Lesion diagnosis from a probability CSV
    Classification,
    /// Lesion segmentation from mask directories
    Segmentation,
}

impl From<TaskArg> for TaskKind {
    fn from(task: TaskArg) -> Self {
        match task {
            TaskArg::Classification => TaskKind::Classification,
            TaskArg::Segmentation => TaskKind::Segmentation,
        }
    }
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Score(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => {
                subcommand.execute();
                Ok(())
            }
        }
    }
}

impl ListCommands {
    /// Print the requested listing
    pub fn execute(&self) {
        for line in self.lines() {
            println!("{line}");
        }
    }

    fn lines(&self) -> Vec<String> {
        match self {
            ListCommands::Categories => isic_core::ISIC_2018_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            ListCommands::Formats => vec![
                "text      Score lines followed by one line per metric".to_string(),
                "json      Score mapping and metric records as JSON".to_string(),
                "markdown  Score list and metric table".to_string(),
            ],
        }
    }
}

/// Initialize logging based on verbosity level
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        // A logger may already be installed when commands run in-process.
        let env = env_logger::Env::default().default_filter_or(log_level);
        let _ = env_logger::Builder::from_env(env).try_init();
    }
}
