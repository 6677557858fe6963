//! Integration tests for the isic-score CLI

use assert_cmd::Command;
use image::{GrayImage, Luma};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn write_mask(path: &Path, side: u32) {
    GrayImage::from_fn(8, 8, |x, y| {
        if x < side && y < side {
            Luma([255])
        } else {
            Luma([0])
        }
    })
    .save(path)
    .unwrap();
}

#[test]
fn test_score_classification_text() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("score")
        .arg("--truth")
        .arg(fixture_path("truth.csv"))
        .arg("--prediction")
        .arg(fixture_path("prediction.csv"));

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Overall: 0.8333333333333334\nValidation: 0.8333333333333334\n",
        ))
        .stdout(predicate::str::contains("MEL\n  accuracy: 0.75"))
        .stdout(predicate::str::contains("spec_at_sens_95"));
}

#[test]
fn test_score_classification_json() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("score")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("prediction.csv"))
        .arg("-f")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["task"], "classification");
    assert_eq!(value["score"]["overall"], 0.8333333333333334);
    assert_eq!(value["metrics"].as_array().unwrap().len(), 7);
}

#[test]
fn test_score_markdown_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("report.md");

    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("score")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("prediction.csv"))
        .arg("-f")
        .arg("markdown")
        .arg("-o")
        .arg(&output);

    cmd.assert().success().stdout(predicate::str::is_empty());

    let report = fs::read_to_string(&output).unwrap();
    assert!(report.starts_with("# classification score"));
    assert!(report.contains("| Category | accuracy |"));
}

#[test]
fn test_score_reports_validation_error() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("score")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("prediction_missing_columns.csv"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing columns in CSV: ['NV', 'VASC'].",
        ));
}

#[test]
fn test_score_segmentation() {
    let temp_dir = TempDir::new().unwrap();
    let truth = temp_dir.path().join("truth");
    let prediction = temp_dir.path().join("prediction");
    fs::create_dir(&truth).unwrap();
    fs::create_dir(&prediction).unwrap();
    write_mask(&truth.join("ISIC_0000001_segmentation.png"), 4);
    write_mask(&prediction.join("ISIC_0000001_segmentation.png"), 4);

    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("score")
        .arg("--task")
        .arg("segmentation")
        .arg("-t")
        .arg(&truth)
        .arg("-p")
        .arg(&prediction)
        .arg("-q");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("Overall: 1.0\nValidation: 1.0\n"))
        .stdout(predicate::str::contains("ISIC_0000001\n  accuracy: 1.0"))
        .stdout(predicate::str::contains("thresholded_jaccard: 1.0"));
}

#[test]
fn test_score_segmentation_missing_masks() {
    let temp_dir = TempDir::new().unwrap();
    let truth = temp_dir.path().join("truth");
    let prediction = temp_dir.path().join("prediction");
    fs::create_dir(&truth).unwrap();
    fs::create_dir(&prediction).unwrap();
    write_mask(&truth.join("ISIC_0000001.png"), 2);

    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("score")
        .arg("--task")
        .arg("segmentation")
        .arg("-t")
        .arg(&truth)
        .arg("-p")
        .arg(&prediction)
        .arg("-q");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing masks for images: ['ISIC_0000001'].",
        ));
}

#[test]
fn test_score_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("scoring.toml");
    fs::write(
        &config,
        "[subsets]\nvalidation = [\"ISIC_0000001\", \"ISIC_0000002\"]\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("score")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("prediction.csv"))
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Validation: 1.0\n"));
}

#[test]
fn test_nonexistent_input() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("score")
        .arg("-t")
        .arg("nonexistent.csv")
        .arg("-p")
        .arg(fixture_path("prediction.csv"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found: nonexistent.csv"));
}

#[test]
fn test_validate_command() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("validate")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("prediction.csv"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("✓ Submission is valid!"))
        .stdout(predicate::str::contains("Images: 4"));
}

#[test]
fn test_validate_command_failure() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("validate")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("prediction_missing_columns.csv"));

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("✗ Submission is invalid!"))
        .stderr(predicate::str::contains("Missing columns in CSV"));
}

#[test]
fn test_generate_config() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("scoring.toml");

    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("generate-config")
        .arg("--task")
        .arg("segmentation")
        .arg("-o")
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("generated successfully"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("kind = \"segmentation\""));
    assert!(content.contains("jaccard_threshold = 0.65"));
}

#[test]
fn test_list_categories() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("list").arg("categories");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MEL"))
        .stdout(predicate::str::contains("VASC"));
}

#[test]
fn test_list_formats() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("list").arg("formats");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("text"))
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("markdown"));
}

#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("isic-score").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("generate-config"));
}
