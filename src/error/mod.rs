use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

use crate::mapper::MapError;

pub mod codes;
pub mod helpers;

pub use codes::{describe_error_code, ErrorCode};
pub use helpers::ErrorExt;

/// The unified error type for parmap's configuration, CLI and benchmark layers
#[derive(Error, Debug)]
pub enum ParmapError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Execution error: {message}")]
    Execution {
        code: u16,
        message: String,
        operation: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ParmapError {
    /// Create a configuration error with specific code and path
    pub fn config_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an execution error with specific code
    pub fn execution_with_code(
        code: u16,
        message: impl Into<String>,
        operation: Option<String>,
    ) -> Self {
        Self::Execution {
            code,
            message: message.into(),
            operation,
            source: None,
        }
    }

    /// Create a validation error with specific code and field
    pub fn validation_with_code(
        code: u16,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Execution { source: src, .. }
            | Self::Validation { source: src, .. }
            | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Execution { .. } => 5,
            Self::Validation { .. } => 8,
            Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Execution { code, .. }
            | Self::Validation { code, .. }
            | Self::Other { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, path, .. } => match path {
                Some(p) => format!("Configuration problem in {}: {}", p.display(), message),
                None => format!("Configuration problem: {}", message),
            },
            Self::Execution {
                message, operation, ..
            } => match operation {
                Some(op) => format!("'{}' failed: {}", op, message),
                None => format!("Execution error: {}", message),
            },
            Self::Validation { message, field, .. } => match field {
                Some(f) => format!("Validation error for '{}': {}", f, message),
                None => format!("Validation error: {}", message),
            },
            Self::Other { message, .. } => message.clone(),
        }
    }
}

/// Type alias for Results using ParmapError
pub type Result<T> = std::result::Result<T, ParmapError>;

impl From<std::io::Error> for ParmapError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let code = match err.kind() {
            ErrorKind::NotFound => ErrorCode::CONFIG_NOT_FOUND,
            ErrorKind::PermissionDenied => ErrorCode::CONFIG_PATH_ERROR,
            ErrorKind::BrokenPipe => ErrorCode::EXEC_OUTPUT_ERROR,
            _ => ErrorCode::EXEC_IO_ERROR,
        };

        if code == ErrorCode::EXEC_IO_ERROR || code == ErrorCode::EXEC_OUTPUT_ERROR {
            ParmapError::execution_with_code(code, "I/O operation failed", None).with_source(err)
        } else {
            ParmapError::config_with_code(code, "Cannot access configuration", None)
                .with_source(err)
        }
    }
}

impl From<toml::de::Error> for ParmapError {
    fn from(err: toml::de::Error) -> Self {
        ParmapError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid TOML syntax", None)
            .with_source(err)
    }
}

impl From<toml::ser::Error> for ParmapError {
    fn from(err: toml::ser::Error) -> Self {
        ParmapError::config_with_code(
            ErrorCode::CONFIG_SERIALIZE_ERROR,
            "Cannot render configuration",
            None,
        )
        .with_source(err)
    }
}

impl From<serde_json::Error> for ParmapError {
    fn from(err: serde_json::Error) -> Self {
        ParmapError::execution_with_code(
            ErrorCode::EXEC_OUTPUT_ERROR,
            "Cannot encode JSON output",
            None,
        )
        .with_source(err)
    }
}

impl<E: Display> From<MapError<E>> for ParmapError {
    fn from(err: MapError<E>) -> Self {
        let code = match &err {
            MapError::Transform { .. } => ErrorCode::EXEC_TRANSFORM_FAILED,
            MapError::Panicked { .. } => ErrorCode::EXEC_WORKER_PANICKED,
        };
        ParmapError::execution_with_code(code, err.to_string(), Some("parallel map".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation_and_chaining() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "parmap.toml");
        let err = ParmapError::config_with_code(
            ErrorCode::CONFIG_GENERIC,
            "Cannot read file",
            Some(PathBuf::from("parmap.toml")),
        )
        .with_source(io_err);

        assert_eq!(err.code(), ErrorCode::CONFIG_GENERIC);
        assert!(err.to_string().contains("[E1000]"));
        assert!(err.user_message().contains("Cannot read file"));
        assert!(err.user_message().contains("in parmap.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_exit_codes() {
        let err = ParmapError::config_with_code(ErrorCode::CONFIG_NOT_FOUND, "missing", None);
        assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
        assert_eq!(err.exit_code(), 2);

        let exec = ParmapError::execution_with_code(ErrorCode::EXEC_GENERIC, "boom", None);
        assert_eq!(exec.exit_code(), 5);
        let invalid =
            ParmapError::validation_with_code(ErrorCode::VALIDATION_GENERIC, "bad", None);
        assert_eq!(invalid.exit_code(), 8);
        let other = ParmapError::Other {
            code: ErrorCode::OTHER_GENERIC,
            message: "???".to_string(),
            source: None,
        };
        assert_eq!(other.exit_code(), 1);
        assert_eq!(other.user_message(), "???");
    }

    #[test]
    fn test_map_error_conversion_keeps_index() {
        let err: ParmapError = MapError::Transform {
            index: 42,
            cause: "negative pixel".to_string(),
        }
        .into();

        assert_eq!(err.code(), ErrorCode::EXEC_TRANSFORM_FAILED);
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("negative pixel"));
        assert!(err.user_message().starts_with("'parallel map' failed"));
    }

    #[test]
    fn test_panic_conversion_uses_panic_code() {
        let err: ParmapError = MapError::<String>::Panicked {
            index: 3,
            message: "overflow".to_string(),
        }
        .into();

        assert_eq!(err.code(), ErrorCode::EXEC_WORKER_PANICKED);
    }

    #[test]
    fn test_io_error_classification() {
        let missing: ParmapError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert_eq!(missing.code(), ErrorCode::CONFIG_NOT_FOUND);

        let pipe: ParmapError = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert_eq!(pipe.code(), ErrorCode::EXEC_OUTPUT_ERROR);
        assert_eq!(pipe.exit_code(), 5);
    }

    #[test]
    fn test_validation_user_message_names_field() {
        let err = ParmapError::validation_with_code(
            ErrorCode::VALIDATION_OUT_OF_RANGE,
            "must be below the input length",
            Some("fail_at".to_string()),
        );
        assert_eq!(
            err.user_message(),
            "Validation error for 'fail_at': must be below the input length"
        );
    }
}
