//! Image-indexed probability tables
//!
//! A [`ProbabilityTable`] holds one row per image identifier and one column
//! per category of a [`TableSchema`], in the schema's canonical order. Both
//! submitted predictions and ground truth use this type.

use crate::error::{Result, ScoreError};
use ndarray::{Array2, ArrayView1, Axis};
use std::collections::HashSet;

/// Category labels of the 2018 lesion diagnosis task, in canonical order
pub const ISIC_2018_CATEGORIES: [&str; 7] = ["MEL", "NV", "BCC", "AKIEC", "BKL", "DF", "VASC"];

/// Name of the identifier column in ISIC submissions
pub const DEFAULT_INDEX_COLUMN: &str = "image";

/// The fixed layout a probability table must follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Header name of the image identifier column
    pub index_column: String,
    /// Category columns in canonical order
    pub categories: Vec<String>,
}

impl TableSchema {
    /// Create a schema from an index column and ordered categories
    pub fn new<I, S>(index_column: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index_column: index_column.into(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Schema of the 2018 lesion diagnosis task
    pub fn isic_2018() -> Self {
        Self::new(DEFAULT_INDEX_COLUMN, ISIC_2018_CATEGORIES)
    }

    /// Position of a category in canonical order
    pub fn category_position(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::isic_2018()
    }
}

/// Per-category probabilities indexed by image identifier
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    categories: Vec<String>,
    images: Vec<String>,
    values: Array2<f64>,
}

impl ProbabilityTable {
    /// Build a table from row identifiers and a rows x categories matrix
    ///
    /// Fails if the matrix shape does not match the identifiers and
    /// categories. Values are not range-checked here; that belongs to the
    /// CSV validation pipeline.
    pub fn new<I, S>(categories: &[String], images: I, values: Array2<f64>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let images: Vec<String> = images.into_iter().map(Into::into).collect();
        if values.nrows() != images.len() || values.ncols() != categories.len() {
            return Err(ScoreError::InvalidInput(format!(
                "table shape {:?} does not match {} images x {} categories",
                values.shape(),
                images.len(),
                categories.len()
            )));
        }
        Ok(Self {
            categories: categories.to_vec(),
            images,
            values,
        })
    }

    /// Build a table from per-row vectors, mostly useful in tests
    pub fn from_rows<S: Into<String>>(
        categories: &[String],
        rows: Vec<(S, Vec<f64>)>,
    ) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = categories.len();
        let mut images = Vec::with_capacity(n_rows);
        let mut flat = Vec::with_capacity(n_rows * n_cols);
        for (image, row) in rows {
            let image = image.into();
            if row.len() != n_cols {
                return Err(ScoreError::InvalidInput(format!(
                    "row for image {image} has {} values, expected {n_cols}",
                    row.len()
                )));
            }
            images.push(image);
            flat.extend(row);
        }
        let values = Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| ScoreError::InvalidInput(e.to_string()))?;
        Self::new(categories, images, values)
    }

    /// Category names in column order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Image identifiers in row order
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// The rows x categories value matrix
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Shape as `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Values of one category column
    pub fn column(&self, category: &str) -> Option<ArrayView1<'_, f64>> {
        let position = self.categories.iter().position(|c| c == category)?;
        Some(self.values.column(position))
    }

    /// Values of one image row
    pub fn row(&self, image: &str) -> Option<ArrayView1<'_, f64>> {
        let position = self.images.iter().position(|i| i == image)?;
        Some(self.values.row(position))
    }

    /// Whether a row exists for the identifier
    pub fn contains(&self, image: &str) -> bool {
        self.images.iter().any(|i| i == image)
    }

    /// Remove the rows whose identifier is in `excluded`, in place
    ///
    /// Identifiers that are not present are ignored, so excluding the same
    /// set twice is the same as excluding it once.
    pub fn exclude_rows<I, S>(&mut self, excluded: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded: HashSet<String> = excluded
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        let keep: Vec<usize> = self
            .images
            .iter()
            .enumerate()
            .filter(|(_, image)| !excluded.contains(image.as_str()))
            .map(|(i, _)| i)
            .collect();
        if keep.len() == self.images.len() {
            return;
        }
        tracing::debug!(
            removed = self.images.len() - keep.len(),
            remaining = keep.len(),
            "excluded rows"
        );
        self.take_rows(&keep);
    }

    /// Keep only the rows whose identifier is in `selected`, in row order
    ///
    /// Returns a new table; identifiers without a row are ignored.
    pub fn select_rows<I, S>(&self, selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected: HashSet<String> = selected
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        let keep: Vec<usize> = self
            .images
            .iter()
            .enumerate()
            .filter(|(_, image)| selected.contains(image.as_str()))
            .map(|(i, _)| i)
            .collect();
        let mut subset = self.clone();
        subset.take_rows(&keep);
        subset
    }

    /// Reorder rows in place into ascending identifier order
    pub fn sort_rows(&mut self) {
        let mut order: Vec<usize> = (0..self.images.len()).collect();
        order.sort_by(|&a, &b| self.images[a].cmp(&self.images[b]));
        if order.iter().enumerate().all(|(i, &j)| i == j) {
            return;
        }
        self.take_rows(&order);
    }

    fn take_rows(&mut self, indices: &[usize]) {
        self.values = self.values.select(Axis(0), indices);
        self.images = indices.iter().map(|&i| self.images[i].clone()).collect();
    }
}
