use quick_xml::events::attributes::AttrError;

use super::element::Name;
use super::status::{Scope, Status};

/// Errors raised while turning elements into typed values
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Missing child")]
    MissingChild,
    #[error("Wrong token")]
    WrongToken,
    #[error("Tag not found")]
    TagNotFound,
    #[error("Invalid value")]
    InvalidValue,
    #[error("Unknown namespace prefix {0:?}")]
    UnknownNamespacePrefix(String),
    #[error("Utf8 Error")]
    Utf8Error(#[from] std::str::Utf8Error),
    #[error("Quick XML error")]
    QuickXml(#[from] quick_xml::Error),
    #[error("Number parsing error")]
    Int(#[from] std::num::ParseIntError),
    #[error("Found EOF while expecting data")]
    Eof,
}
impl From<AttrError> for ParsingError {
    fn from(value: AttrError) -> Self {
        Self::QuickXml(value.into())
    }
}

/// Every way an operation of this crate can fail
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed status line or timestamp
    #[error("invalid format: {0}")]
    Format(String),

    /// The element does not have the shape of the requested type
    #[error("decoding failed: {0}")]
    Decode(#[from] ParsingError),

    /// The requested type has no XML name, it can't be looked up
    #[error("type {0} has no XML name")]
    Name(&'static str),

    #[error("missing prop {name} in response for {href:?}")]
    PropNotFound { name: Name, href: Option<String> },

    #[error("missing response for href {0:?}")]
    ResponseNotFound(String),

    /// A non-success status blocks access to the data
    #[error("HTTP error ({scope}): {status}")]
    Status { status: Status, scope: Scope },

    #[error("malformed response: expected exactly one href element, got {0}")]
    Cardinality(usize),

    /// Failure of the XML writer
    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl Error {
    pub(crate) fn format(what: &str, input: &str, why: impl std::fmt::Display) -> Self {
        Self::Format(format!("{} {:?}: {}", what, input, why))
    }
}
