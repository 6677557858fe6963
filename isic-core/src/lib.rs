//! Scoring primitives for the ISIC skin lesion analysis challenges
//!
//! This crate validates submitted probability tables against ground truth,
//! loads binary segmentation masks, and computes the binary, similarity and
//! ranking metrics used to rank challenge submissions. Everything here is
//! pure computation over in-memory data or single files; task orchestration
//! lives in `isic-engine`.
//!
//! # Architecture
//!
//! - **table / validation**: CSV parsing into a canonical [`ProbabilityTable`]
//!   and row-set checks between truth and prediction
//! - **mask**: greyscale mask loading and binarization
//! - **metrics**: confusion counts and the metric records derived from them
//! - **score**: the two-number aggregate reported to participants
//!
//! Every invariant violation surfaces as a [`ScoreError`] whose message is
//! meant to be shown to the submitter verbatim.
//!
//! # Example
//!
//! ```rust
//! use isic_core::{parse_csv, validate_rows, TableSchema};
//!
//! let schema = TableSchema::new("image", ["MEL", "NV"]);
//! let truth = parse_csv("image,MEL,NV\nISIC_0000000,1.0,0.0\n".as_bytes(), &schema).unwrap();
//! let prediction = parse_csv("image,NV,MEL\nISIC_0000000,0.2,0.8\n".as_bytes(), &schema).unwrap();
//!
//! validate_rows(&truth, &prediction).unwrap();
//! assert_eq!(prediction.row("ISIC_0000000").unwrap().to_vec(), vec![0.8, 0.2]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod mask;
pub mod metrics;
pub mod score;
pub mod table;
pub mod validation;

pub use error::{KeyList, Result, ScoreError};
pub use mask::{assert_binary_image, load_binary_mask, load_segmentation_image, BinaryMask};
pub use metrics::{find_metric, MetricRecord, Tfpn};
pub use score::Score;
pub use table::{ProbabilityTable, TableSchema, DEFAULT_INDEX_COLUMN, ISIC_2018_CATEGORIES};
pub use validation::{
    compare_identifiers, exclude_rows, parse_csv, sort_rows, validate_rows, IdentifierDiff,
};
