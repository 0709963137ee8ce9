//! Error types for the conformance explorer

use std::fmt;
use thiserror::Error;

use crate::resolver::PathError;

/// Which closed option set a rejected value was parsed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `FilterOption`
    Filter,
    /// `SortOption`
    Sort,
    /// ECMAScript edition flag
    Edition,
    /// Test outcome wire code
    Outcome,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Filter => write!(f, "filter"),
            OptionKind::Sort => write!(f, "sort"),
            OptionKind::Edition => write!(f, "edition"),
            OptionKind::Outcome => write!(f, "outcome"),
        }
    }
}

/// Main error type for the conformance explorer
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure while retrieving a result payload
    #[error("FetchError: {url}: {message}")]
    Fetch { url: String, message: String },

    /// The server answered, but not with a success status
    #[error("FetchError: {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The payload was not valid JSON or did not match the result schema
    #[error("DecodeError: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },

    /// IO error
    #[error("IOError: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The payload decoded but violates a tree-shape invariant
    #[error("PayloadError: {0}")]
    Payload(String),

    /// A test path could not be resolved against the loaded tree
    #[error("PathError: {0}")]
    Path(#[from] PathError),

    /// Results were accessed before the first load completed
    #[error("NotLoaded: no conformance results have been loaded yet")]
    NotLoaded,

    /// A free-form string was outside a closed option set
    #[error("InvalidOption: '{value}' is not a valid {kind} option")]
    InvalidOption { kind: OptionKind, value: String },

    /// A search query could not be turned back into a state
    #[error("QueryError: {0}")]
    Query(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("ConfigError: {0}")]
    Config(String),

    /// A version tag is not among the known versions
    #[error("UnknownVersion: '{0}'")]
    UnknownVersion(String),
}

impl Error {
    /// Create a transport error for `url`
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid option error
    pub fn invalid_option(kind: OptionKind, value: impl Into<String>) -> Self {
        Error::InvalidOption {
            kind,
            value: value.into(),
        }
    }

    /// Whether the error came from retrieving or decoding a payload
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Error::Fetch { .. }
                | Error::HttpStatus { .. }
                | Error::Decode { .. }
                | Error::Io { .. }
                | Error::Payload(_)
        )
    }
}

/// Result type alias for the conformance explorer
pub type Result<T> = std::result::Result<T, Error>;
