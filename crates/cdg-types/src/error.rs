//! Error type shared by every CDG crate

use std::fmt;

pub type CdgResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	/// The authenticated user lacks the capability required for the operation
	PermissionDenied,
	/// Missing, forged or expired request token
	Unauthorized,
	ValidationError(String),
	ConfigError(String),
	/// The persistence layer rejected a read or write
	StorageError(String),
	SerializationError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::StorageError(msg) => write!(f, "storage error: {}", msg),
			Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "I/O error: {}", err),
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

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::SerializationError(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display() {
		assert_eq!(Error::PermissionDenied.to_string(), "permission denied");
		assert_eq!(
			Error::ValidationError("Unknown section: foo".into()).to_string(),
			"validation error: Unknown section: foo"
		);
	}

	#[test]
	fn test_from_json_error() {
		let err = serde_json::from_str::<serde_json::Value>("{").map(|_| ()).unwrap_err();
		assert!(matches!(Error::from(err), Error::SerializationError(_)));
	}
}

// vim: ts=4
