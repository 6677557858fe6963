//! Input abstraction for probability tables
//!
//! Ground truth and predictions may come from files, in-memory text, or any
//! reader. [`TableInput`] unifies them behind a single buffered reader.

use crate::error::{EngineError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::PathBuf;

/// Source of a CSV probability table
pub enum TableInput {
    /// CSV text held in memory
    Text(String),
    /// Path of a CSV file
    File(PathBuf),
    /// Raw CSV bytes
    Bytes(Vec<u8>),
    /// Reader stream (stdin, network, etc.)
    Reader(Box<dyn Read + Send>),
}

impl std::fmt::Debug for TableInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableInput::Text(text) => f
                .debug_tuple("Text")
                .field(&format!("<{} chars>", text.len()))
                .finish(),
            TableInput::File(path) => f.debug_tuple("File").field(path).finish(),
            TableInput::Bytes(bytes) => f
                .debug_tuple("Bytes")
                .field(&format!("<{} bytes>", bytes.len()))
                .finish(),
            TableInput::Reader(_) => f.debug_tuple("Reader").field(&"<Reader>").finish(),
        }
    }
}

impl TableInput {
    /// Create input from CSV text
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        TableInput::Text(text.into())
    }

    /// Create input from a file path
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Self {
        TableInput::File(path.into())
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        TableInput::Reader(Box::new(reader))
    }

    /// Human-readable origin, used in log events
    pub fn describe(&self) -> String {
        match self {
            TableInput::File(path) => path.display().to_string(),
            TableInput::Text(_) => "<text>".to_string(),
            TableInput::Bytes(_) => "<bytes>".to_string(),
            TableInput::Reader(_) => "<stream>".to_string(),
        }
    }

    /// Open the input as a buffered reader
    pub fn into_reader(self) -> Result<Box<dyn BufRead + Send>> {
        match self {
            TableInput::Text(text) => Ok(Box::new(Cursor::new(text.into_bytes()))),
            TableInput::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes))),
            TableInput::File(path) => {
                let file = File::open(&path).map_err(|e| {
                    EngineError::IoError(format!("Failed to read file {}: {e}", path.display()))
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
            TableInput::Reader(reader) => Ok(Box::new(BufReader::new(reader))),
        }
    }
}

impl From<String> for TableInput {
    fn from(text: String) -> Self {
        TableInput::Text(text)
    }
}

impl From<PathBuf> for TableInput {
    fn from(path: PathBuf) -> Self {
        TableInput::File(path)
    }
}

impl From<Vec<u8>> for TableInput {
    fn from(bytes: Vec<u8>) -> Self {
        TableInput::Bytes(bytes)
    }
}
