//! Validation pipeline for submitted probability tables
//!
//! [`parse_csv`] turns a raw comma-delimited stream into a
//! [`ProbabilityTable`], failing on the first class of problem found:
//!
//! 1. missing index column
//! 2. missing, then extra, then duplicated category columns
//! 3. missing values
//! 4. non-floating-point values
//! 5. values outside `[0.0, 1.0]`
//! 6. duplicated image identifiers
//!
//! [`validate_rows`] then checks that a prediction covers exactly the ground
//! truth's identifiers.

use crate::error::{KeyList, Result, ScoreError};
use crate::table::{ProbabilityTable, TableSchema};
use ndarray::Array2;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::BufRead;

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// One data line of the stream, before numeric conversion
struct RawRow {
    image: String,
    /// Cells of the category columns in canonical order; `None` when blank
    /// or absent
    cells: Vec<Option<String>>,
}

/// Parse and validate a submitted probability table
///
/// Columns may appear in any order in the input; the returned table uses the
/// schema's canonical category order and keeps the input row order.
pub fn parse_csv<R: BufRead>(reader: R, schema: &TableSchema) -> Result<ProbabilityTable> {
    let mut lines = numbered_lines(reader)?.into_iter();

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| ScoreError::MalformedCsv("No columns to parse from file".to_string()))?;
    let header = split_fields(header_line.trim_start_matches('\u{feff}'));

    let index_position = header
        .iter()
        .position(|name| *name == schema.index_column)
        .ok_or_else(|| ScoreError::MissingIndexColumn(schema.index_column.clone()))?;

    let column_positions = check_columns(&header, index_position, schema)?;

    let mut rows = Vec::new();
    for (line_number, line) in lines {
        let fields = split_fields(&line);
        if fields.len() > header.len() {
            return Err(ScoreError::MalformedCsv(format!(
                "Expected {} fields in line {}, saw {}",
                header.len(),
                line_number,
                fields.len()
            )));
        }
        let image = fields.get(index_position).cloned().unwrap_or_default();
        let cells = column_positions
            .iter()
            .map(|&position| {
                fields
                    .get(position)
                    .filter(|cell| !cell.trim().is_empty())
                    .cloned()
            })
            .collect();
        rows.push(RawRow { image, cells });
    }
    tracing::debug!(rows = rows.len(), "read CSV rows");

    let missing: Vec<&str> = rows
        .iter()
        .filter(|row| row.image.is_empty() || row.cells.iter().any(Option::is_none))
        .map(|row| row.image.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(ScoreError::MissingValues(KeyList::new(missing)));
    }

    let n_rows = rows.len();
    let n_cols = schema.categories.len();
    let mut values = Array2::<f64>::zeros((n_rows, n_cols));
    let mut non_float_columns = BTreeSet::new();
    for (i, row) in rows.iter().enumerate() {
        for (j, cell) in row.cells.iter().enumerate() {
            match cell.as_deref().and_then(parse_float) {
                Some(value) => values[[i, j]] = value,
                None => {
                    non_float_columns.insert(schema.categories[j].as_str());
                }
            }
        }
    }
    if !non_float_columns.is_empty() {
        return Err(ScoreError::NonFloatColumns(KeyList::new(non_float_columns)));
    }

    let out_of_range: Vec<&str> = rows
        .iter()
        .zip(values.rows())
        .filter(|(_, row_values)| row_values.iter().any(|v| !(0.0..=1.0).contains(v)))
        .map(|(row, _)| row.image.as_str())
        .collect();
    if !out_of_range.is_empty() {
        return Err(ScoreError::OutOfRange(KeyList::new(out_of_range)));
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<&str> = rows
        .iter()
        .map(|row| row.image.as_str())
        .filter(|image| !seen.insert(*image))
        .collect();
    if !duplicates.is_empty() {
        return Err(ScoreError::DuplicateImages(KeyList::new(duplicates)));
    }

    ProbabilityTable::new(
        &schema.categories,
        rows.into_iter().map(|row| row.image),
        values,
    )
}

/// Check the header against the schema and map each category to its position
fn check_columns(
    header: &[String],
    index_position: usize,
    schema: &TableSchema,
) -> Result<Vec<usize>> {
    let data_columns: Vec<(usize, &str)> = header
        .iter()
        .enumerate()
        .filter(|(position, _)| *position != index_position)
        .map(|(position, name)| (position, name.as_str()))
        .collect();

    let present: HashSet<&str> = data_columns.iter().map(|(_, name)| *name).collect();
    let expected: HashSet<&str> = schema.categories.iter().map(String::as_str).collect();

    let missing: Vec<&str> = expected.difference(&present).copied().collect();
    if !missing.is_empty() {
        return Err(ScoreError::missing_columns(missing));
    }

    let extra: Vec<&str> = present.difference(&expected).copied().collect();
    if !extra.is_empty() {
        return Err(ScoreError::extra_columns(extra));
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, name) in &data_columns {
        *counts.entry(*name).or_default() += 1;
    }
    let duplicated: Vec<&str> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();
    if !duplicated.is_empty() {
        return Err(ScoreError::DuplicateColumns(KeyList::new(duplicated)));
    }

    Ok(schema
        .categories
        .iter()
        .filter_map(|category| {
            data_columns
                .iter()
                .find(|(_, name)| *name == category.as_str())
                .map(|(position, _)| *position)
        })
        .collect())
}

/// Read non-blank lines with their 1-based line numbers
fn numbered_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ScoreError::MalformedCsv(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        lines.push((i + 1, line));
    }
    Ok(lines)
}

/// Split one line on commas, honouring double-quoted fields
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE if in_quotes => {
                if chars.peek() == Some(&QUOTE) {
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            QUOTE if field.is_empty() => in_quotes = true,
            DELIMITER if !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Parse a cell as a base-10 float
///
/// Only digits, signs, a decimal point and an exponent marker are accepted,
/// so tokens like `True`, `'0.5'`, `nan` or `inf` are rejected.
fn parse_float(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty()
        || !cell
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    cell.parse::<f64>().ok()
}

/// Identifiers present on one side only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierDiff {
    /// Expected identifiers absent from the candidate
    pub missing: Vec<String>,
    /// Candidate identifiers absent from the expected set
    pub extra: Vec<String>,
}

impl IdentifierDiff {
    /// Whether both sets were identical
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Compare an expected identifier set with a candidate set
///
/// Both result lists are sorted.
pub fn compare_identifiers<'a, I, J>(expected: I, candidate: J) -> IdentifierDiff
where
    I: IntoIterator<Item = &'a str>,
    J: IntoIterator<Item = &'a str>,
{
    let expected: BTreeSet<&str> = expected.into_iter().collect();
    let candidate: BTreeSet<&str> = candidate.into_iter().collect();
    IdentifierDiff {
        missing: expected
            .difference(&candidate)
            .map(|s| s.to_string())
            .collect(),
        extra: candidate
            .difference(&expected)
            .map(|s| s.to_string())
            .collect(),
    }
}

/// Ensure a prediction has exactly the ground truth's identifiers
///
/// Missing identifiers are reported before extra ones; only one class of
/// problem is reported per call.
pub fn validate_rows(truth: &ProbabilityTable, prediction: &ProbabilityTable) -> Result<()> {
    let diff = compare_identifiers(
        truth.images().iter().map(String::as_str),
        prediction.images().iter().map(String::as_str),
    );
    if !diff.missing.is_empty() {
        return Err(ScoreError::missing_images(diff.missing));
    }
    if !diff.extra.is_empty() {
        return Err(ScoreError::extra_images(diff.extra));
    }
    Ok(())
}

/// Remove excluded identifiers from a table, in place
pub fn exclude_rows<I, S>(table: &mut ProbabilityTable, excluded: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    table.exclude_rows(excluded);
}

/// Sort a table's rows by identifier, in place
pub fn sort_rows(table: &mut ProbabilityTable) {
    table.sort_rows();
}
