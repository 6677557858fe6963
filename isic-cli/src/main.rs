//! `isic-score` command-line entry point

use clap::Parser;
use isic_cli::commands::Commands;

/// Score ISIC challenge submissions
#[derive(Debug, Parser)]
#[command(name = "isic-score")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.command.execute() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_command() {
        let cli = Cli::try_parse_from([
            "isic-score",
            "score",
            "--truth",
            "truth.csv",
            "--prediction",
            "prediction.csv",
            "-f",
            "markdown",
            "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Score(args) => {
                assert_eq!(args.verbose, 2);
                assert_eq!(args.format, isic_cli::commands::score::OutputFormat::Markdown);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
