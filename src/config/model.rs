//! Configuration payload shape and the fixed wire envelopes around it.

// self
use crate::{_prelude::*, token::TokenSecret};

/// Runtime parameters delivered by the configuration endpoint.
///
/// Every field is optional. A partially populated configuration is valid; the
/// operation that needs a particular field fails on its own when that field is
/// absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
	/// Base URL for authenticated API calls.
	pub api_url: Option<String>,
	/// Bearer token used while no user is signed in.
	pub anon_token: Option<TokenSecret>,
	/// Minimum application version the backend still supports.
	pub min_app_version: Option<String>,
}

/// Outer wire envelope the configuration endpoint wraps successful payloads in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigEnvelope<C> {
	/// Data wrapper.
	pub data: ConfigPayload<C>,
}

/// Inner wrapper carrying the configuration record itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigPayload<C> {
	/// Decoded configuration record.
	pub config: C,
}

/// Error body the configuration endpoint returns on non-success statuses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerError {
	/// Human-readable server-supplied reason.
	pub error: String,
}
