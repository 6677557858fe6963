//! Task orchestration for ISIC challenge scoring
//!
//! This crate turns configuration and input locations into a scored
//! report: it loads tables or masks, runs the validation pipeline from
//! `isic-core`, computes per-category or per-image metrics and aggregates
//! them into a [`Score`].

#![warn(missing_docs)]

pub mod classification;
pub mod config;
pub mod error;
pub mod input;
pub mod scorer;
pub mod segmentation;

// Re-export key types
pub use classification::{score_classification, CategoryMetrics, ClassificationReport};
pub use config::{
    ClassificationConfig, ScoringConfig, SegmentationConfig, SubsetConfig, TaskConfig, TaskKind,
};
pub use error::{EngineError, Result};
pub use input::TableInput;
pub use scorer::{MetricGroup, Scorer, ScorerBuilder, TaskReport};
pub use segmentation::{
    score_segmentation, score_segmentation_with_progress, ImageMetrics, SegmentationReport,
};

// Re-export from core for convenience
pub use isic_core::{MetricRecord, Score, ScoreError};
