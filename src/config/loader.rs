//! Built-in configuration loaders: remote endpoint first, bundled fallback second.

// std
use std::marker::PhantomData;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	bundle::ResourceBundle,
	config::{ConfigEnvelope, ConfigLoader, LoaderFuture, ServerError},
	error::TransportError,
	http::{self, HttpTransport, Method, TransportRequest},
	obs::{self, OpKind},
	token::TokenSecret,
};

/// Bundle resource name (sans extension) holding the remote loader's bootstrap settings.
pub const BOOTSTRAP_RESOURCE: &str = "bootstrap";
/// Bundle resource name (sans extension) holding the packaged default configuration.
pub const DEFAULT_CONFIG_RESOURCE: &str = "default_config";

/// Static settings that bootstrap the remote loader.
///
/// These come from the resource bundle, never from the cached configuration:
/// the remote loader feeds the cache, so it cannot read from it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSettings {
	/// Origin serving the configuration endpoint.
	pub config_api_url: String,
	/// API key presented as a bearer token to the configuration endpoint.
	pub config_api_token: TokenSecret,
	/// Product identifier appended to the configuration endpoint path.
	pub product_id: String,
}
impl BootstrapSettings {
	/// Builds the configuration endpoint URL for this product.
	pub fn endpoint_url(&self) -> Result<Url, url::ParseError> {
		Url::parse(&format!("{}/api/v1/config/{}", self.config_api_url, self.product_id))
	}
}

/// Failure modes the remote loader absorbs into an absent configuration.
#[derive(Debug, ThisError)]
pub enum RemoteLoadError {
	/// Bootstrap settings are missing from the bundle or undecodable.
	#[error("Bootstrap settings are missing or malformed.")]
	Bootstrap,
	/// Bootstrap settings produced an unparsable endpoint URL.
	#[error("Configuration endpoint URL could not be parsed.")]
	Endpoint(#[from] url::ParseError),
	/// Endpoint answered with a non-success status and a server-supplied reason.
	#[error("Configuration endpoint returned status {status}: {message}")]
	Rejected {
		/// HTTP status code of the response.
		status: u16,
		/// Server-supplied reason.
		message: String,
	},
	/// Response body did not match the expected shape.
	#[error("Configuration payload is malformed.")]
	Decode(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// Transport failed before a response was produced.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

fn decode<T>(bytes: &[u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
}

/// Loader that fetches the configuration from the remote endpoint.
///
/// Bootstrap settings are re-read from the bundle on every attempt, so a
/// missing or malformed bootstrap resource degrades this loader to a permanent
/// miss instead of failing construction.
pub struct RemoteConfigLoader<C> {
	bundle: Arc<dyn ResourceBundle>,
	transport: Arc<dyn HttpTransport>,
	resource: String,
	_marker: PhantomData<fn() -> C>,
}
impl<C> RemoteConfigLoader<C> {
	/// Creates a loader reading bootstrap settings from [`BOOTSTRAP_RESOURCE`].
	pub fn new(bundle: Arc<dyn ResourceBundle>, transport: Arc<dyn HttpTransport>) -> Self {
		Self::with_resource(bundle, transport, BOOTSTRAP_RESOURCE)
	}

	/// Creates a loader reading bootstrap settings from a custom resource name.
	pub fn with_resource(
		bundle: Arc<dyn ResourceBundle>,
		transport: Arc<dyn HttpTransport>,
		resource: impl Into<String>,
	) -> Self {
		Self { bundle, transport, resource: resource.into(), _marker: PhantomData }
	}

	async fn bootstrap_settings(&self) -> Option<BootstrapSettings> {
		let bytes = self.bundle.read(&self.resource, "json").await?;

		serde_json::from_slice(&bytes).ok()
	}

	async fn fetch(&self) -> Result<C, RemoteLoadError>
	where
		C: DeserializeOwned,
	{
		let settings = self.bootstrap_settings().await.ok_or(RemoteLoadError::Bootstrap)?;
		let url = settings.endpoint_url()?;
		let request = TransportRequest {
			method: Method::Get,
			url,
			headers: vec![
				(http::ACCEPT.to_owned(), http::APPLICATION_JSON.to_owned()),
				(
					http::AUTHORIZATION.to_owned(),
					format!("Bearer {}", settings.config_api_token.expose()),
				),
			],
			body: None,
		};
		let response = self.transport.send(request).await?;
		let status = response.metadata.status;

		if status == 200 {
			let envelope = decode::<ConfigEnvelope<C>>(&response.body)?;

			Ok(envelope.data.config)
		} else {
			let reason = decode::<ServerError>(&response.body)?;

			Err(RemoteLoadError::Rejected { status, message: reason.error })
		}
	}
}
impl<C> Debug for RemoteConfigLoader<C> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RemoteConfigLoader").field("resource", &self.resource).finish()
	}
}
impl<C> ConfigLoader<C> for RemoteConfigLoader<C>
where
	C: DeserializeOwned + Send,
{
	fn load(&self) -> LoaderFuture<'_, C> {
		Box::pin(async move {
			match self.fetch().await {
				Ok(config) => Some(config),
				Err(e) => {
					obs::record_absorbed_failure(OpKind::ConfigLoad, "remote", &e);

					None
				},
			}
		})
	}
}

/// Loader that decodes a default configuration packaged with the application.
pub struct LocalConfigLoader<C> {
	bundle: Arc<dyn ResourceBundle>,
	resource: String,
	_marker: PhantomData<fn() -> C>,
}
impl<C> LocalConfigLoader<C> {
	/// Creates a loader reading the configuration from [`DEFAULT_CONFIG_RESOURCE`].
	pub fn new(bundle: Arc<dyn ResourceBundle>) -> Self {
		Self::with_resource(bundle, DEFAULT_CONFIG_RESOURCE)
	}

	/// Creates a loader reading the configuration from a custom resource name.
	pub fn with_resource(bundle: Arc<dyn ResourceBundle>, resource: impl Into<String>) -> Self {
		Self { bundle, resource: resource.into(), _marker: PhantomData }
	}
}
impl<C> Debug for LocalConfigLoader<C> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LocalConfigLoader").field("resource", &self.resource).finish()
	}
}
impl<C> ConfigLoader<C> for LocalConfigLoader<C>
where
	C: DeserializeOwned + Send,
{
	fn load(&self) -> LoaderFuture<'_, C> {
		Box::pin(async move {
			let bytes = self.bundle.read(&self.resource, "json").await?;

			match decode::<C>(&bytes) {
				Ok(config) => Some(config),
				Err(e) => {
					obs::record_absorbed_failure(OpKind::ConfigLoad, "local", &e);

					None
				},
			}
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		bundle::StaticBundle,
		config::AppConfig,
		http::{ResponseMetadata, TransportFuture, TransportResponse},
	};

	struct CannedTransport {
		status: u16,
		body: &'static str,
		seen: Mutex<Vec<TransportRequest>>,
	}
	impl CannedTransport {
		fn new(status: u16, body: &'static str) -> Arc<Self> {
			Arc::new(Self { status, body, seen: Mutex::new(Vec::new()) })
		}
	}
	impl HttpTransport for CannedTransport {
		fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
			self.seen.lock().push(request);

			Box::pin(async move {
				Ok(TransportResponse {
					body: self.body.as_bytes().to_vec(),
					metadata: ResponseMetadata { status: self.status, headers: Vec::new() },
				})
			})
		}
	}

	fn bootstrap_bundle() -> Arc<StaticBundle> {
		Arc::new(StaticBundle::new().with(
			BOOTSTRAP_RESOURCE,
			"json",
			br#"{"configApiUrl":"https://config.example.com","configApiToken":"cfg-key","productId":"basketbuddy"}"#
				.as_slice(),
		))
	}

	#[test]
	fn endpoint_url_joins_origin_and_product() {
		let settings = BootstrapSettings {
			config_api_url: "https://config.example.com".into(),
			config_api_token: TokenSecret::new("cfg-key"),
			product_id: "basketbuddy".into(),
		};

		assert_eq!(
			settings.endpoint_url().expect("Endpoint URL should parse.").as_str(),
			"https://config.example.com/api/v1/config/basketbuddy"
		);
	}

	#[tokio::test]
	async fn remote_loader_unwraps_envelope() {
		let transport = CannedTransport::new(
			200,
			r#"{"data":{"config":{"apiUrl":"https://api.example.com","anonToken":"anon-123"}}}"#,
		);
		let loader =
			RemoteConfigLoader::<AppConfig>::new(bootstrap_bundle(), transport.clone());
		let config = loader.load().await.expect("Remote loader should produce a configuration.");

		assert_eq!(config.api_url.as_deref(), Some("https://api.example.com"));

		let seen = transport.seen.lock();

		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].method, Method::Get);
		assert_eq!(seen[0].url.as_str(), "https://config.example.com/api/v1/config/basketbuddy");
		assert!(
			seen[0]
				.headers
				.iter()
				.any(|(name, value)| name == http::AUTHORIZATION && value == "Bearer cfg-key")
		);
	}

	#[tokio::test]
	async fn remote_loader_absorbs_server_rejection() {
		let transport = CannedTransport::new(503, r#"{"error":"maintenance window"}"#);
		let loader = RemoteConfigLoader::<AppConfig>::new(bootstrap_bundle(), transport);

		assert_eq!(loader.load().await, None);
	}

	#[tokio::test]
	async fn remote_loader_absorbs_missing_bootstrap() {
		let transport = CannedTransport::new(200, "{}");
		let loader =
			RemoteConfigLoader::<AppConfig>::new(Arc::new(StaticBundle::new()), transport.clone());

		assert_eq!(loader.load().await, None);
		// Without bootstrap settings no request goes out at all.
		assert!(transport.seen.lock().is_empty());
	}

	#[tokio::test]
	async fn local_loader_decodes_bundled_default() {
		let bundle = Arc::new(StaticBundle::new().with(
			DEFAULT_CONFIG_RESOURCE,
			"json",
			br#"{"apiUrl":"https://fallback.example.com"}"#.as_slice(),
		));
		let loader = LocalConfigLoader::<AppConfig>::new(bundle);
		let config = loader.load().await.expect("Local loader should decode the bundled default.");

		assert_eq!(config.api_url.as_deref(), Some("https://fallback.example.com"));
	}

	#[tokio::test]
	async fn local_loader_absorbs_malformed_resource() {
		let bundle = Arc::new(StaticBundle::new().with(
			DEFAULT_CONFIG_RESOURCE,
			"json",
			b"not json at all".as_slice(),
		));
		let loader = LocalConfigLoader::<AppConfig>::new(bundle);

		assert_eq!(loader.load().await, None);
	}
}
