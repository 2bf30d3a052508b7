//! error type shared by matrix construction and matrix reordering.
//!
//! Every error is fatal: nothing is recovered locally, the binaries abort before
//! the output file is put in place.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatError {
    /// missing, unreadable or unwritable file
    #[error("i/o error on {path} : {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// label (fasta) file could not be parsed
    #[error("bad fasta label file {input} : {msg}")]
    Fasta { input: String, msg: String },
    /// malformed row or field in a tabular input. line is 1-based, 0 if unknown
    #[error("format error in {input} at line {line} : {msg}")]
    Format {
        input: String,
        line: u64,
        msg: String,
    },
    /// the same label occurs twice where labels must be unique
    #[error("duplicate label {label} in {input}")]
    DuplicateLabel { input: String, label: String },
    /// tree labels and matrix labels do not describe the same set
    #[error("consistency error : {0}")]
    Consistency(String),
} // end of MatError

impl MatError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        MatError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn format(input: &str, line: u64, msg: impl Into<String>) -> Self {
        MatError::Format {
            input: input.to_string(),
            line,
            msg: msg.into(),
        }
    }

    /// converts a csv error, keeping io errors apart from format errors
    pub(crate) fn from_csv(input: &str, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(source) => MatError::Io {
                path: input.to_string(),
                source,
            },
            kind => MatError::format(input, line, format!("{:?}", kind)),
        }
    }
} // end of impl MatError
