//! Input path checks
//!
//! Classification takes two CSV files; segmentation takes two directories
//! of masks. Paths are checked up front so that a typo fails with a clear
//! message before any scoring work starts.

use crate::error::CliError;
use anyhow::Result;
use isic_engine::TaskKind;
use std::path::{Path, PathBuf};

/// Ground truth and prediction locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    /// Ground-truth CSV file or mask directory
    pub truth: PathBuf,
    /// Prediction CSV file or mask directory
    pub prediction: PathBuf,
}

impl InputPaths {
    /// Create from two paths
    pub fn new(truth: impl Into<PathBuf>, prediction: impl Into<PathBuf>) -> Self {
        Self {
            truth: truth.into(),
            prediction: prediction.into(),
        }
    }

    /// Ensure both paths exist and have the kind the task needs
    pub fn check(&self, task: TaskKind) -> Result<()> {
        check_path(&self.truth, task)?;
        check_path(&self.prediction, task)?;
        Ok(())
    }
}

fn check_path(path: &Path, task: TaskKind) -> Result<()> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()).into());
    }
    let (ok, expected) = match task {
        TaskKind::Classification => (path.is_file(), "a CSV file"),
        TaskKind::Segmentation => (path.is_dir(), "a directory of masks"),
    };
    if !ok {
        return Err(CliError::WrongInputKind {
            path: path.display().to_string(),
            expected,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classification_needs_files() {
        let temp_dir = TempDir::new().unwrap();
        let csv = temp_dir.path().join("truth.csv");
        fs::write(&csv, "image,MEL\n").unwrap();

        assert!(InputPaths::new(&csv, &csv)
            .check(TaskKind::Classification)
            .is_ok());

        let err = InputPaths::new(temp_dir.path(), &csv)
            .check(TaskKind::Classification)
            .unwrap_err();
        assert!(err.to_string().starts_with("Expected a CSV file"));
    }

    #[test]
    fn test_segmentation_needs_directories() {
        let temp_dir = TempDir::new().unwrap();
        assert!(InputPaths::new(temp_dir.path(), temp_dir.path())
            .check(TaskKind::Segmentation)
            .is_ok());

        let csv = temp_dir.path().join("truth.csv");
        fs::write(&csv, "").unwrap();
        let err = InputPaths::new(temp_dir.path(), &csv)
            .check(TaskKind::Segmentation)
            .unwrap_err();
        assert!(err.to_string().contains("directory of masks"));
    }

    #[test]
    fn test_missing_path() {
        let err = InputPaths::new("/nonexistent/a.csv", "/nonexistent/b.csv")
            .check(TaskKind::Classification)
            .unwrap_err();
        assert_eq!(err.to_string(), "File not found: /nonexistent/a.csv");
    }
}
