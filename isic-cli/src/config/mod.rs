//! Configuration module
//!
//! Resolves the scoring configuration from an optional TOML file and
//! command-line overrides.

use crate::error::CliError;
use anyhow::Result;
use isic_engine::{ScoringConfig, TaskKind};
use std::path::Path;

/// Load the scoring configuration
///
/// Without a file, the defaults of `task` (or classification) are used.
/// With a file, `task` overrides the file's task selection.
pub fn load_scoring_config(path: Option<&Path>, task: Option<TaskKind>) -> Result<ScoringConfig> {
    let mut config = match path {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            ScoringConfig::from_file(path).map_err(|e| CliError::ConfigError(e.to_string()))?
        }
        None => match task {
            Some(TaskKind::Segmentation) => ScoringConfig::segmentation(),
            _ => ScoringConfig::classification(),
        },
    };

    if let Some(task) = task {
        config.task.kind = task;
    }
    Ok(config)
}

/// Commented TOML template for a task
pub fn config_template(task: TaskKind) -> Result<String> {
    let config = match task {
        TaskKind::Classification => ScoringConfig::classification(),
        TaskKind::Segmentation => ScoringConfig::segmentation(),
    };
    let body = toml::to_string_pretty(&config)
        .map_err(|e| CliError::ConfigError(format!("Failed to render template: {e}")))?;

    Ok(format!(
        r#"# ISIC scoring configuration ({task})
#
# [task] kind: "classification" (CSV files) or "segmentation" (mask directories)
# [classification] categories are the CSV columns in canonical order;
#   sensitivity_thresholds add one spec_at_sens_* metric per value
# [segmentation] jaccard_threshold zeroes per-image Jaccard values below it;
#   mask_pattern selects mask files inside both directories
# [subsets] exclude removes images before scoring; validation selects the
#   images of the validation score (empty means all)

{body}"#
    ))
}
