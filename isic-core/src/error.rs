//! Error types for scoring
//!
//! Every validation or computation failure surfaces as a [`ScoreError`].
//! Variants that name several offending identifiers or columns carry a
//! [`KeyList`], which is always sorted and deduplicated so that messages are
//! deterministic for a given input.

use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Sorted, deduplicated list of offending keys (image ids or column names)
///
/// Renders as a bracketed list of quoted keys, e.g. `['NV', 'VASC']`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyList(Vec<String>);

impl KeyList {
    /// Build a key list, sorting and removing duplicates
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        Self(unique.into_iter().collect())
    }

    /// The keys in ascending order
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys were collected
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_quoted(f, key)?;
        }
        f.write_str("]")
    }
}

// Single quotes unless the key holds a single quote and no double quote.
fn write_quoted(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    let quote = if key.contains('\'') && !key.contains('"') {
        '"'
    } else {
        '\''
    };
    write!(f, "{quote}")?;
    for ch in key.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "{quote}")
}

/// The single failure type of the scoring core
///
/// Variants only distinguish the class of problem; the user-facing contract
/// is the message produced by `Display`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// The identifier column is absent from the header
    #[error("Missing column in CSV: \"{0}\".")]
    MissingIndexColumn(String),

    /// Category columns absent from the header
    #[error("Missing columns in CSV: {0}.")]
    MissingColumns(KeyList),

    /// Header columns that are not categories
    #[error("Extra columns in CSV: {0}.")]
    ExtraColumns(KeyList),

    /// Header columns that appear more than once
    #[error("Duplicate columns in CSV: {0}.")]
    DuplicateColumns(KeyList),

    /// The stream could not be split into a header and rows
    #[error("Could not parse CSV: \"{0}\".")]
    MalformedCsv(String),

    /// Rows with at least one blank or absent cell
    #[error("Missing value(s) in CSV for images: {0}.")]
    MissingValues(KeyList),

    /// Columns holding at least one cell that is not a float
    #[error("CSV contains non-floating-point value(s) in columns: {0}.")]
    NonFloatColumns(KeyList),

    /// Rows holding at least one value outside the unit interval
    #[error("Values in CSV are outside the interval [0.0, 1.0] for images: {0}.")]
    OutOfRange(KeyList),

    /// Identifiers that occur on more than one row
    #[error("Duplicate images in CSV: {0}.")]
    DuplicateImages(KeyList),

    /// Ground-truth identifiers absent from the prediction
    #[error("Missing images in CSV: {0}.")]
    MissingImages(KeyList),

    /// Prediction identifiers absent from the ground truth
    #[error("Extra images in CSV: {0}.")]
    ExtraImages(KeyList),

    /// Ground-truth masks without a predicted mask
    #[error("Missing masks for images: {0}.")]
    MissingMasks(KeyList),

    /// Predicted masks without a ground-truth mask
    #[error("Extra masks for images: {0}.")]
    ExtraMasks(KeyList),

    /// The image file could not be read or decoded
    #[error("Could not decode image \"{name}\" because: \"{reason}\"")]
    ImageDecode {
        /// File name of the image
        name: String,
        /// Underlying decoder message
        reason: String,
    },

    /// The decoded image is not 8-bit greyscale
    #[error("Image {0} is not single-channel (greyscale).")]
    NotGreyscale(String),

    /// The mask cannot be reduced to the values 0 and 255
    #[error("Image {0} contains values other than 0 and 255.")]
    NotBinary(String),

    /// A predicted mask does not match the ground-truth dimensions
    #[error("Image {name} has dimensions {actual}; expected {expected}.")]
    DimensionMismatch {
        /// Image identifier
        name: String,
        /// Dimensions of the prediction, as `HxW`
        actual: String,
        /// Dimensions of the ground truth, as `HxW`
        expected: String,
    },

    /// Truth and test arrays of different shape
    #[error("Truth and test arrays differ in shape: {truth:?} vs {test:?}")]
    ShapeMismatch {
        /// Shape of the truth array
        truth: Vec<usize>,
        /// Shape of the test array
        test: Vec<usize>,
    },

    /// Any other argument that violates a metric precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ScoreError {
    /// Missing category columns
    pub fn missing_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScoreError::MissingColumns(KeyList::new(columns))
    }

    /// Unrecognized columns
    pub fn extra_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScoreError::ExtraColumns(KeyList::new(columns))
    }

    /// Images missing from a prediction
    pub fn missing_images<I, S>(images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScoreError::MissingImages(KeyList::new(images))
    }

    /// Images a prediction should not contain
    pub fn extra_images<I, S>(images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScoreError::ExtraImages(KeyList::new(images))
    }
}

/// Result type for scoring operations
pub type Result<T> = std::result::Result<T, ScoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_list_sorts_and_dedups() {
        let keys = KeyList::new(["VASC", "NV", "VASC"]);
        assert_eq!(keys.as_slice(), &["NV".to_string(), "VASC".to_string()]);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.to_string(), "['NV', 'VASC']");
    }

    #[test]
    fn test_key_list_quote_selection() {
        assert_eq!(KeyList::new(["it's"]).to_string(), "[\"it's\"]");
        assert_eq!(
            KeyList::new(["a'b\"c"]).to_string(),
            "['a\\'b\"c']"
        );
        assert_eq!(KeyList::new(Vec::<String>::new()).to_string(), "[]");
    }

    #[test]
    fn test_schema_error_messages() {
        assert_eq!(
            ScoreError::MissingIndexColumn("image".to_string()).to_string(),
            "Missing column in CSV: \"image\"."
        );
        assert_eq!(
            ScoreError::missing_columns(["VASC", "NV"]).to_string(),
            "Missing columns in CSV: ['NV', 'VASC']."
        );
        assert_eq!(
            ScoreError::extra_columns(["FOO", "BAZ"]).to_string(),
            "Extra columns in CSV: ['BAZ', 'FOO']."
        );
    }

    #[test]
    fn test_row_error_messages() {
        assert_eq!(
            ScoreError::missing_images(["B"]).to_string(),
            "Missing images in CSV: ['B']."
        );
        assert_eq!(
            ScoreError::extra_images(["ISIC_0000127", "ISIC_0000126"]).to_string(),
            "Extra images in CSV: ['ISIC_0000126', 'ISIC_0000127']."
        );
    }

    #[test]
    fn test_image_error_messages() {
        let error = ScoreError::ImageDecode {
            name: "mask.png".to_string(),
            reason: "unexpected EOF".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Could not decode image \"mask.png\" because: \"unexpected EOF\""
        );
        assert_eq!(
            ScoreError::NotBinary("ISIC_0000000".to_string()).to_string(),
            "Image ISIC_0000000 contains values other than 0 and 255."
        );
    }
}
