//! Crate-level error types shared across the config, credential, token, and request layers.

// self
use crate::{_prelude::*, credential::CredentialError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Configuration loads never surface here: both loaders failing is reported as an
/// absent configuration, not an error, so callers can retry on a later call.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential-store failure, preserved with its specific kind so callers can
	/// distinguish "nothing stored yet" from "store malfunction".
	#[error("{0}")]
	Credential(#[from] CredentialError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The loaded configuration carries no anonymous token.
	#[error("Anonymous token is not present in the loaded configuration.")]
	TokenNotConfigured,
	/// The loaded configuration carries no base URL.
	#[error("Base URL is not present in the loaded configuration.")]
	BaseUrlNotConfigured,
	/// Concatenating the base URL and an endpoint did not produce a parseable URL.
	#[error("Request URL `{url}` could not be parsed.")]
	MalformedUrl {
		/// Offending concatenation of base URL and endpoint.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
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
