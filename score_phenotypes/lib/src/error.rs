// errors shared by the phenotype scorer and the clade converter

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetaError {
    /// External program ran but did not exit cleanly
    #[error("`{program} {args}` failed ({status}): {stderr}")]
    ExternalCommand {
        program: String,
        args: String,
        status: String,
        stderr: String,
    },

    /// External program could not be started at all
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("column '{column}' not found in {}; available columns: {available}", .path.display())]
    MissingColumn {
        column: String,
        path: PathBuf,
        available: String,
    },

    /// Missing, empty or header-only table
    #[error("{} {reason}", .path.display())]
    EmptyTable { path: PathBuf, reason: String },

    #[error("{} line {line}: expected at least {expected} fields, found {found}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{} has {found} columns, expected exactly {expected}", .path.display())]
    ColumnCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("{0}")]
    Unsupported(String),

    #[error("invalid ordinal scale: {0}")]
    InvalidScale(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MetaError>;

impl MetaError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        MetaError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn empty(path: &Path, reason: &str) -> Self {
        MetaError::EmptyTable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
