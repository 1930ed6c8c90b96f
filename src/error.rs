//! Typed errors for malformed notification input.
//!
//! Everything else propagates as `anyhow::Error`; these variants exist so
//! callers can tell a bad input file apart from an I/O failure.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Malformed SentDate {value:?} on line {line}")]
    MalformedDate { line: u64, value: String },
}
