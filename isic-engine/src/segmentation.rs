//! Lesion boundary segmentation scoring
//!
//! Masks are paired by the ISIC identifier embedded in their file names.
//! Each pair is scored independently; the aggregate is the mean thresholded
//! Jaccard index.

use crate::config::ScoringConfig;
use crate::error::{EngineError, Result};
use isic_core::metrics::{compute_common_metrics, compute_similarity_metrics};
use isic_core::{find_metric, load_binary_mask, KeyList, MetricRecord, Score, ScoreError};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Pattern of the image identifier inside mask file names
pub const IMAGE_ID_PATTERN: &str = r"ISIC_\d{7}";

/// Metrics of one predicted mask
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMetrics {
    /// Image identifier
    pub image: String,
    /// Metric records in reporting order
    pub metrics: Vec<MetricRecord>,
}

impl ImageMetrics {
    /// The value that enters the aggregate score
    pub fn thresholded_jaccard(&self) -> f64 {
        find_metric(&self.metrics, "thresholded_jaccard")
            .and_then(|record| record.value)
            .unwrap_or(0.0)
    }
}

/// Result of scoring a segmentation submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationReport {
    /// Aggregate score (mean thresholded Jaccard)
    pub score: Score,
    /// Per-image metrics in identifier order
    pub images: Vec<ImageMetrics>,
}

/// Score a directory of predicted masks against ground-truth masks
pub fn score_segmentation(
    truth_dir: &Path,
    prediction_dir: &Path,
    config: &ScoringConfig,
) -> Result<SegmentationReport> {
    score_segmentation_with_progress(truth_dir, prediction_dir, config, |_| {})
}

/// Like [`score_segmentation`], calling `on_image` after each scored image
pub fn score_segmentation_with_progress<F>(
    truth_dir: &Path,
    prediction_dir: &Path,
    config: &ScoringConfig,
    mut on_image: F,
) -> Result<SegmentationReport>
where
    F: FnMut(&str),
{
    let truth_masks = scorable_masks(truth_dir, config)?;
    let prediction_masks = scorable_masks(prediction_dir, config)?;
    tracing::debug!(
        truth = truth_masks.len(),
        prediction = prediction_masks.len(),
        "discovered masks"
    );

    let missing: Vec<&String> = truth_masks
        .keys()
        .filter(|image| !prediction_masks.contains_key(*image))
        .collect();
    if !missing.is_empty() {
        return Err(ScoreError::MissingMasks(KeyList::new(missing.into_iter().cloned())).into());
    }
    let extra: Vec<&String> = prediction_masks
        .keys()
        .filter(|image| !truth_masks.contains_key(*image))
        .collect();
    if !extra.is_empty() {
        return Err(ScoreError::ExtraMasks(KeyList::new(extra.into_iter().cloned())).into());
    }
    if truth_masks.is_empty() {
        return Err(ScoreError::InvalidInput("no masks to score".to_string()).into());
    }

    let jaccard_threshold = config.segmentation.jaccard_threshold;
    let mut images = Vec::with_capacity(truth_masks.len());
    for (image, truth_path) in &truth_masks {
        let prediction_path = &prediction_masks[image];
        images.push(score_image(image, truth_path, prediction_path, jaccard_threshold)?);
        on_image(image);
    }

    let overall = mean_thresholded_jaccard(images.iter());
    let validation = validation_score(&images, config)?.unwrap_or(overall);
    let score = Score::new(overall, validation);
    tracing::info!(
        images = images.len(),
        overall = score.overall,
        validation = score.validation,
        "scored segmentation"
    );

    Ok(SegmentationReport { score, images })
}

/// Masks in `dir` that take part in scoring, excluded images removed
pub fn scorable_masks(dir: &Path, config: &ScoringConfig) -> Result<BTreeMap<String, PathBuf>> {
    let mut masks = discover_masks(dir, &config.segmentation.mask_pattern)?;
    for image in &config.subsets.exclude {
        masks.remove(image);
    }
    Ok(masks)
}

/// Score one predicted mask against its ground truth
pub fn score_image(
    image: &str,
    truth_path: &Path,
    prediction_path: &Path,
    jaccard_threshold: f64,
) -> Result<ImageMetrics> {
    let truth = load_binary_mask(truth_path)?;
    let prediction = load_binary_mask(prediction_path)?;

    if truth.dim() != prediction.dim() {
        let (truth_h, truth_w) = truth.dim();
        let (prediction_h, prediction_w) = prediction.dim();
        return Err(ScoreError::DimensionMismatch {
            name: image.to_string(),
            actual: format!("{prediction_h}x{prediction_w}"),
            expected: format!("{truth_h}x{truth_w}"),
        }
        .into());
    }

    let truth = truth.to_bool();
    let prediction = prediction.to_bool();
    let mut metrics = compute_common_metrics(&truth, &prediction)?;
    metrics.extend(compute_similarity_metrics(&truth, &prediction)?);

    let jaccard = find_metric(&metrics, "jaccard").and_then(|record| record.value);
    metrics.push(MetricRecord::defined(
        "thresholded_jaccard",
        threshold_jaccard(jaccard, jaccard_threshold),
    ));
    tracing::trace!(image, ?jaccard, "scored image");

    Ok(ImageMetrics {
        image: image.to_string(),
        metrics,
    })
}

/// Jaccard value entering the aggregate
///
/// An undefined Jaccard means both masks are empty, which is perfect
/// agreement. Values below the threshold count as 0.
pub fn threshold_jaccard(jaccard: Option<f64>, threshold: f64) -> f64 {
    match jaccard {
        None => 1.0,
        Some(value) if value >= threshold => value,
        Some(_) => 0.0,
    }
}

fn mean_thresholded_jaccard<'a>(images: impl Iterator<Item = &'a ImageMetrics>) -> f64 {
    let (total, count) = images.fold((0.0, 0usize), |(total, count), image| {
        (total + image.thresholded_jaccard(), count + 1)
    });
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn validation_score(images: &[ImageMetrics], config: &ScoringConfig) -> Result<Option<f64>> {
    let subset = &config.subsets.validation;
    if subset.is_empty() {
        return Ok(None);
    }

    let unknown: Vec<&String> = subset
        .iter()
        .filter(|id| !images.iter().any(|image| &image.image == *id))
        .collect();
    if !unknown.is_empty() {
        return Err(ScoreError::MissingMasks(KeyList::new(unknown.into_iter().cloned())).into());
    }

    let selected = images.iter().filter(|image| subset.contains(&image.image));
    Ok(Some(mean_thresholded_jaccard(selected)))
}

/// Find the mask files in a directory, keyed by image identifier
pub fn discover_masks(dir: &Path, pattern: &str) -> Result<BTreeMap<String, PathBuf>> {
    if !dir.is_dir() {
        return Err(EngineError::IoError(format!(
            "Mask directory not found: {}",
            dir.display()
        )));
    }

    let image_id = Regex::new(IMAGE_ID_PATTERN)
        .map_err(|e| EngineError::ConfigError(format!("Invalid image id pattern: {e}")))?;
    let full_pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();
    let paths = glob::glob(&full_pattern).map_err(|e| {
        EngineError::ConfigError(format!("Invalid mask pattern '{pattern}': {e}"))
    })?;

    let mut masks = BTreeMap::new();
    for entry in paths {
        let path = entry.map_err(|e| EngineError::IoError(e.to_string()))?;
        if !path.is_file() {
            continue;
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(found) = image_id.find(&file_name) else {
            return Err(ScoreError::InvalidInput(format!(
                "No image identifier in file name: {file_name}"
            ))
            .into());
        };
        let image = found.as_str().to_string();
        if let Some(previous) = masks.insert(image.clone(), path) {
            return Err(ScoreError::InvalidInput(format!(
                "Multiple masks for image {image} in {}: {}",
                dir.display(),
                previous.display()
            ))
            .into());
        }
    }
    Ok(masks)
}
