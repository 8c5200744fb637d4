//! token-inspect error types.

use std::io;

use thiserror::Error;

/// Errors that stop a command.
///
/// Failed lookups in the default `lookup` command are not errors: they are
/// part of the report.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Aptos(#[from] aptos_kit::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_error_display_config() {
        let err = InspectError::Config("invalid --creator".into());
        assert_eq!(err.to_string(), "configuration error: invalid --creator");
    }

    #[test]
    fn inspect_error_from_aptos_is_transparent() {
        let err = InspectError::from(aptos_kit::Error::NoFaucet);
        assert_eq!(err.to_string(), aptos_kit::Error::NoFaucet.to_string());
    }

    #[test]
    fn inspect_error_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert!(matches!(InspectError::from(io_err), InspectError::Io(_)));
    }
}
