//! Error taxonomy for the game core
//!
//! Only configuration and persistence can fail. Gameplay outcomes such as a
//! rejected flip or a mismatch are ordinary values, not errors.

use std::fmt;
use std::io;

/// Errors surfaced by board generation, settings and persistence
#[derive(Debug)]
pub enum Error {
    /// Bad board dimensions, image count or settings
    InvalidConfiguration(String),
    /// Save/load I/O failure (non-fatal to the session)
    Io(io::Error),
    /// No saved game exists
    NotFound,
    /// Saved data exists but could not be decoded
    Corrupt(String),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration(reason.into())
    }

    /// True for the "nothing usable was saved" family (NotFound, Corrupt)
    pub fn is_missing_save(&self) -> bool {
        matches!(self, Error::NotFound | Error::Corrupt(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration(reason) => write!(f, "invalid configuration: {}", reason),
            Error::Io(err) => write!(f, "save I/O failed: {}", err),
            Error::NotFound => write!(f, "no saved game found"),
            Error::Corrupt(reason) => write!(f, "saved game is corrupt: {}", reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Error::NotFound
        } else {
            Error::Io(err)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Corrupt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::NotFound));
        assert!(err.is_missing_save());
    }

    #[test]
    fn test_other_io_stays_io() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_missing_save());
    }

    #[test]
    fn test_json_error_is_corrupt() {
        let err: Error = serde_json::from_str::<u32>("{not json").unwrap_err().into();
        assert!(matches!(err, Error::Corrupt(_)));
        assert!(err.to_string().starts_with("saved game is corrupt"));
    }
}
