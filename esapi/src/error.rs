//! Error types for the API binding

use crate::transport::TransportError;
use thiserror::Error;

/// Errors raised while composing or dispatching an action
#[derive(Error, Debug)]
pub enum Error {
    #[error("Required argument '{0}' missing")]
    MissingRequiredArgument(String),

    #[error("Invalid value for '{argument}': {reason}")]
    InvalidArgumentShape { argument: String, reason: String },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Action table error: {0}")]
    Registry(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    pub(crate) fn invalid_shape(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArgumentShape {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Stable label for the error kind, suitable for log fields
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::MissingRequiredArgument(_) => "missing_required_argument",
            Error::InvalidArgumentShape { .. } => "invalid_argument_shape",
            Error::UnknownAction(_) => "unknown_action",
            Error::Registry(_) => "registry",
            Error::Config(_) => "config",
            Error::Json(_) => "json",
            Error::Yaml(_) => "yaml",
            Error::Toml(_) => "toml",
            Error::Io(_) => "io",
            Error::Transport(_) => "transport",
        }
    }

    /// Argument errors are raised before any request is sent
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::MissingRequiredArgument(_) | Error::InvalidArgumentShape { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
