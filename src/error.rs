//! Error taxonomy for the codec.
//!
//! Absence is never an error here: a getter asked about a value of the wrong
//! JSON kind answers `None`, which is how optional fields flow through the
//! binding layer. Errors are reserved for the cases below.

use thiserror::Error;

/// Everything a parse, bind, or factory call can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input was missing or empty (e.g. an empty property name or
    /// content-type label).
    #[error("missing or empty argument: {0}")]
    Argument(&'static str),

    /// The content-type label did not match the single supported media type.
    #[error("expected a {expected} content type, received {received:?}")]
    UnsupportedContentType {
        expected: &'static str,
        received: String,
    },

    /// A value was present but its content failed type-specific parsing:
    /// malformed duration, invalid base64, unparsable date, a number that
    /// does not fit the requested width, or an unparsable document.
    /// Distinct from absence — the field is there, it is just corrupt.
    #[error("malformed {kind}: {detail}")]
    Format { kind: &'static str, detail: String },

    /// Programmer or schema misuse that the type system cannot see, e.g. the
    /// undeclared-property number decoder exhausting every numeric width.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The content stream could not be read into the document buffer.
    #[error("failed to read content stream")]
    Io(#[source] std::io::Error),
}

impl Error {
    /// Shorthand for the `Format` arm.
    pub fn format(kind: &'static str, detail: impl Into<String>) -> Self {
        Error::Format {
            kind,
            detail: detail.into(),
        }
    }
}
