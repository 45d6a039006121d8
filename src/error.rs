//! Crate-level error types shared across flows, configuration, and the backend client.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Backend-reported failures are not errors at this level; they travel inside
/// [`ApiEnvelope`](crate::http::ApiEnvelope) so flows can localize them.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, unexpected status, malformed payload).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Backend base URL cannot be joined with an endpoint path.
	#[error("Backend URL is invalid.")]
	InvalidBackendUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configuration value could not be parsed.
	#[error("Configuration value `{key}` is invalid: {value}.")]
	InvalidValue {
		/// Configuration key (remote key name).
		key: &'static str,
		/// Raw value that failed to parse.
		value: String,
	},
	/// The transaction identifier has no characters left after stripping separators.
	#[error("Transaction identifier has no characters left to derive a capture transaction.")]
	EmptyCaptureTransaction,
	/// Transaction identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, wire format).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the authentication backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Backend answered with a non-success HTTP status.
	#[error("Authentication backend responded with HTTP {status}.")]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
	},
	/// Backend responded with JSON that does not match the response envelope.
	#[error("Authentication backend returned malformed JSON.")]
	Decode {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The request timestamp could not be written as RFC 3339.
	#[error("Request timestamp could not be formatted.")]
	Timestamp {
		/// Underlying formatting failure.
		#[source]
		source: time::error::Format,
	},
	/// A request or challenge payload could not be serialized.
	#[error("Request payload could not be serialized.")]
	Encode(#[from] serde_json::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
