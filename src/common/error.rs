//! Unified error types for Pomelo.
//!
//! This module provides a single error type that encompasses errors from
//! package I/O, XML parsing, template rendering, and row processing,
//! presenting a consistent API to users.
use thiserror::Error;

/// Main error type for Pomelo operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Package part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Template marker syntax is malformed (e.g. an opening delimiter with
    /// no matching closing delimiter)
    #[error("Template syntax error: {0}")]
    TemplateSyntax(String),

    /// Template references a variable not present in the context
    #[error("Undefined template variable: {0}")]
    UndefinedVariable(String),

    /// Template rendering failed for a reason other than syntax or an
    /// undefined variable
    #[error("Template error: {0}")]
    TemplateRender(String),

    /// A table row holds a missing value in at least one column.
    ///
    /// Row-scoped and recoverable: the generation loop skips the row and
    /// continues with the next one.
    #[error("Row {row} has a missing value")]
    MissingValue {
        /// Zero-based index of the row in the input table
        row: usize,
    },

    /// External document converter is not available
    #[error("Converter not available: {0}")]
    ConverterUnavailable(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Result type for Pomelo operations.
pub type Result<T> = std::result::Result<T, Error>;
