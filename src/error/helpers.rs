use super::{ErrorCode, ParmapError};
use std::path::Path;

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to a configuration error tied to the file being read
    fn to_config_error(self, path: &Path, code: u16) -> Result<T, ParmapError>;

    /// Convert to an execution error
    fn to_execution_error(self, message: impl Into<String>) -> Result<T, ParmapError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_config_error(self, path: &Path, code: u16) -> Result<T, ParmapError> {
        self.map_err(|e| {
            ParmapError::config_with_code(
                code,
                format!("Cannot load {}", path.display()),
                Some(path.to_path_buf()),
            )
            .with_source(e)
        })
    }

    fn to_execution_error(self, message: impl Into<String>) -> Result<T, ParmapError> {
        self.map_err(|e| {
            ParmapError::execution_with_code(ErrorCode::EXEC_GENERIC, message, None).with_source(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_to_config_error_records_path() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "bad bytes",
        ));
        let err = result
            .to_config_error(Path::new("/tmp/parmap.toml"), ErrorCode::CONFIG_INVALID_TOML)
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_TOML);
        match err {
            ParmapError::Config { path, .. } => {
                assert_eq!(path, Some(PathBuf::from("/tmp/parmap.toml")))
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_to_execution_error_keeps_source() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        let err = result.to_execution_error("Cannot write results").unwrap_err();

        assert_eq!(err.code(), ErrorCode::EXEC_GENERIC);
        assert_eq!(err.exit_code(), 5);
        assert_eq!(err.to_string(), "[E4000] Execution error: Cannot write results");
        assert!(std::error::Error::source(&err).is_some());
    }
}
