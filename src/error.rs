use std::{fmt, io};

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum GtmGraphError {
    #[error("Invalid container input: {0}")]
    InvalidInput(String),
    #[error("Missing containerVersion in container")]
    MissingContainerVersion,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl GtmGraphError {
    /// True for the two error kinds that abort a graph build because of the payload itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GtmGraphError::InvalidInput(_) | GtmGraphError::MissingContainerVersion
        )
    }
}

impl From<JsonError> for GtmGraphError {
    fn from(src: JsonError) -> GtmGraphError {
        GtmGraphError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<toml::de::Error> for GtmGraphError {
    fn from(src: toml::de::Error) -> GtmGraphError {
        GtmGraphError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<io::Error> for GtmGraphError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => GtmGraphError::NotFound(format!("{x}")),
            _ => GtmGraphError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for GtmGraphError {
    fn from(x: fmt::Error) -> Self {
        GtmGraphError::Serialization(format!("{x}"))
    }
}

impl From<RegexError> for GtmGraphError {
    fn from(x: RegexError) -> Self {
        GtmGraphError::Config(format!("Regex parse failed: {x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = GtmGraphError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, GtmGraphError::NotFound(_)));
        assert!(!err.is_input_error());
    }

    #[test]
    fn input_errors_are_flagged() {
        assert!(GtmGraphError::MissingContainerVersion.is_input_error());
        assert!(GtmGraphError::InvalidInput("x".to_string()).is_input_error());
        assert!(!GtmGraphError::Config("x".to_string()).is_input_error());
    }
}
