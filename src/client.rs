//! Authenticated request execution over the configuration-derived base URL.

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use crate::{
	_prelude::*,
	config::AppConfigCache,
	http::{self, HttpTransport, Method, ResponseMetadata, TransportRequest},
	obs::{self, OpKind, OpOutcome, OpSpan},
	token::{AuthState, DynamicTokenProvider, TokenProvider},
};

/// Future type returned by [`UrlProvider`] implementations.
pub type UrlFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + 'a + Send>>;

/// Capability to resolve the base URL for outbound requests.
pub trait UrlProvider
where
	Self: Send + Sync,
{
	/// Resolves the current base URL.
	fn base_url(&self) -> UrlFuture<'_>;
}

/// URL provider backed by the cached configuration's API URL.
#[derive(Clone, Debug)]
pub struct ConfigUrlProvider {
	cache: AppConfigCache,
}
impl ConfigUrlProvider {
	/// Creates a provider over the given cache handle.
	pub fn new(cache: AppConfigCache) -> Self {
		Self { cache }
	}
}
impl UrlProvider for ConfigUrlProvider {
	fn base_url(&self) -> UrlFuture<'_> {
		Box::pin(async move {
			self.cache
				.config()
				.await
				.and_then(|config| config.api_url)
				.ok_or(Error::BaseUrlNotConfigured)
		})
	}
}

/// Builds and executes authenticated API calls.
///
/// Every request resolves its bearer token at send time through the dynamic
/// provider and carries the standard header set. Responses come back as raw
/// bytes plus metadata; interpreting the payload is the caller's business.
pub struct RequestClient {
	url_provider: Arc<dyn UrlProvider>,
	tokens: DynamicTokenProvider,
	transport: Arc<dyn HttpTransport>,
}
#[cfg(feature = "reqwest")]
impl RequestClient {
	/// Creates a client over the crate's default reqwest-backed transport.
	pub fn new(url_provider: Arc<dyn UrlProvider>, tokens: DynamicTokenProvider) -> Self {
		Self::with_transport(url_provider, tokens, Arc::new(ReqwestTransport::default()))
	}
}
impl RequestClient {
	/// Creates a client over a caller-supplied transport.
	pub fn with_transport(
		url_provider: Arc<dyn UrlProvider>,
		tokens: DynamicTokenProvider,
		transport: Arc<dyn HttpTransport>,
	) -> Self {
		Self { url_provider, tokens, transport }
	}

	/// Switches the identity used to sign subsequent requests.
	pub fn set_auth_state(&self, state: AuthState) {
		self.tokens.set_auth_state(state);
	}

	/// Identity currently used to sign requests.
	pub fn auth_state(&self) -> AuthState {
		self.tokens.auth_state()
	}

	/// Builds an absolute request URL from the configured base URL and an
	/// endpoint path.
	///
	/// The endpoint is appended verbatim, so callers supply the leading slash
	/// (or whatever separator their base URL expects) themselves.
	pub async fn create_url(&self, endpoint: &str) -> Result<Url> {
		let base = self.url_provider.base_url().await?;
		let raw = format!("{base}{endpoint}");

		Url::parse(&raw).map_err(|e| Error::MalformedUrl { url: raw, source: e })
	}

	/// Issues a `GET` request.
	pub async fn get(
		&self,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<(Vec<u8>, ResponseMetadata)> {
		self.api_call(Method::Get, url, body).await
	}

	/// Issues a `POST` request.
	pub async fn post(
		&self,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<(Vec<u8>, ResponseMetadata)> {
		self.api_call(Method::Post, url, body).await
	}

	/// Issues a `PUT` request.
	pub async fn put(
		&self,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<(Vec<u8>, ResponseMetadata)> {
		self.api_call(Method::Put, url, body).await
	}

	/// Issues a `PATCH` request.
	pub async fn patch(
		&self,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<(Vec<u8>, ResponseMetadata)> {
		self.api_call(Method::Patch, url, body).await
	}

	/// Issues a `DELETE` request.
	pub async fn delete(
		&self,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<(Vec<u8>, ResponseMetadata)> {
		self.api_call(Method::Delete, url, body).await
	}

	async fn api_call(
		&self,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<(Vec<u8>, ResponseMetadata)> {
		let span = OpSpan::new(OpKind::Request, method.as_str());

		obs::record_op_outcome(OpKind::Request, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.tokens.token().await?;
				let mut headers =
					vec![(http::ACCEPT.to_owned(), http::APPLICATION_JSON.to_owned())];

				if body.is_some() {
					headers
						.push((http::CONTENT_TYPE.to_owned(), http::APPLICATION_JSON.to_owned()));
				}

				headers.push((
					http::AUTHORIZATION.to_owned(),
					format!("Bearer {}", token.expose()),
				));

				let response =
					self.transport.send(TransportRequest { method, url, headers, body }).await?;

				Ok((response.body, response.metadata))
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(OpKind::Request, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(OpKind::Request, OpOutcome::Failure),
		}

		result
	}
}
impl Debug for RequestClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestClient").field("auth_state", &self.auth_state()).finish()
	}
}

/// Joins values into the comma-separated form list query parameters use.
pub fn comma_separated<I, S>(items: I) -> String
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut joined = String::new();

	for (i, item) in items.into_iter().enumerate() {
		if i > 0 {
			joined.push(',');
		}

		joined.push_str(item.as_ref());
	}

	joined
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		http::{TransportFuture, TransportResponse},
		token::{TokenFuture, TokenSecret},
	};

	struct StaticUrl(&'static str);
	impl UrlProvider for StaticUrl {
		fn base_url(&self) -> UrlFuture<'_> {
			Box::pin(async move { Ok(self.0.to_owned()) })
		}
	}

	struct NoUrl;
	impl UrlProvider for NoUrl {
		fn base_url(&self) -> UrlFuture<'_> {
			Box::pin(async move { Err(Error::BaseUrlNotConfigured) })
		}
	}

	struct StubTokens(&'static str);
	impl TokenProvider for StubTokens {
		fn token(&self) -> TokenFuture<'_> {
			Box::pin(async move { Ok(TokenSecret::new(self.0)) })
		}
	}

	#[derive(Clone, Default)]
	struct CaptureTransport {
		seen: Arc<Mutex<Vec<TransportRequest>>>,
	}
	impl HttpTransport for CaptureTransport {
		fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
			self.seen.lock().push(request);

			Box::pin(async move {
				Ok(TransportResponse {
					body: b"ok".to_vec(),
					metadata: ResponseMetadata { status: 200, headers: Vec::new() },
				})
			})
		}
	}

	fn stub_tokens() -> DynamicTokenProvider {
		DynamicTokenProvider::new(Arc::new(StubTokens("anon-1")), Arc::new(StubTokens("user-1")))
	}

	fn client_over(transport: CaptureTransport) -> RequestClient {
		RequestClient::with_transport(
			Arc::new(StaticUrl("https://a")),
			stub_tokens(),
			Arc::new(transport),
		)
	}

	fn header<'a>(request: &'a TransportRequest, name: &str) -> Option<&'a str> {
		request
			.headers
			.iter()
			.find(|(header, _)| header == name)
			.map(|(_, value)| value.as_str())
	}

	#[tokio::test]
	async fn create_url_appends_endpoint_verbatim() {
		let client = client_over(CaptureTransport::default());
		let url = client.create_url("/users").await.expect("URL should build.");

		assert_eq!(url.as_str(), "https://a/users");
	}

	#[tokio::test]
	async fn create_url_reports_unparsable_results() {
		let client = RequestClient::with_transport(
			Arc::new(StaticUrl("not a url")),
			stub_tokens(),
			Arc::new(CaptureTransport::default()),
		);
		let e = client.create_url("/users").await.expect_err("Junk base URL should not parse.");

		assert!(matches!(e, Error::MalformedUrl { .. }));
	}

	#[tokio::test]
	async fn create_url_propagates_missing_base_url() {
		let client = RequestClient::with_transport(
			Arc::new(NoUrl),
			stub_tokens(),
			Arc::new(CaptureTransport::default()),
		);
		let e = client.create_url("/users").await.expect_err("Missing base URL should error.");

		assert!(matches!(e, Error::BaseUrlNotConfigured));
	}

	#[tokio::test]
	async fn bodyless_request_omits_content_type() {
		let transport = CaptureTransport::default();
		let client = client_over(transport.clone());
		let url = client.create_url("/users").await.expect("URL should build.");

		client.get(url, None).await.expect("Request should succeed.");

		let seen = transport.seen.lock();
		let request = &seen[0];

		assert_eq!(request.method, Method::Get);
		assert_eq!(header(request, http::ACCEPT), Some(http::APPLICATION_JSON));
		assert_eq!(header(request, http::CONTENT_TYPE), None);
		assert_eq!(header(request, http::AUTHORIZATION), Some("Bearer anon-1"));
		assert_eq!(request.body, None);
	}

	#[tokio::test]
	async fn body_request_carries_content_type_and_payload() {
		let transport = CaptureTransport::default();
		let client = client_over(transport.clone());
		let url = client.create_url("/users").await.expect("URL should build.");

		client
			.post(url, Some(br#"{"name":"ada"}"#.to_vec()))
			.await
			.expect("Request should succeed.");

		let seen = transport.seen.lock();
		let request = &seen[0];

		assert_eq!(request.method, Method::Post);
		assert_eq!(header(request, http::CONTENT_TYPE), Some(http::APPLICATION_JSON));
		assert_eq!(request.body.as_deref(), Some(br#"{"name":"ada"}"#.as_slice()));
	}

	#[tokio::test]
	async fn auth_state_switch_changes_bearer_token() {
		let transport = CaptureTransport::default();
		let client = client_over(transport.clone());
		let url = client.create_url("/users").await.expect("URL should build.");

		client.get(url.clone(), None).await.expect("Request should succeed.");
		client.set_auth_state(AuthState::Authenticated);
		client.get(url, None).await.expect("Request should succeed.");

		let seen = transport.seen.lock();

		assert_eq!(header(&seen[0], http::AUTHORIZATION), Some("Bearer anon-1"));
		assert_eq!(header(&seen[1], http::AUTHORIZATION), Some("Bearer user-1"));
	}

	#[tokio::test]
	async fn all_verbs_reach_the_transport() {
		let transport = CaptureTransport::default();
		let client = client_over(transport.clone());
		let url = client.create_url("/things").await.expect("URL should build.");

		client.get(url.clone(), None).await.expect("GET should succeed.");
		client.post(url.clone(), None).await.expect("POST should succeed.");
		client.put(url.clone(), None).await.expect("PUT should succeed.");
		client.patch(url.clone(), None).await.expect("PATCH should succeed.");
		client.delete(url, None).await.expect("DELETE should succeed.");

		let methods =
			transport.seen.lock().iter().map(|request| request.method).collect::<Vec<_>>();

		assert_eq!(
			methods,
			[Method::Get, Method::Post, Method::Put, Method::Patch, Method::Delete]
		);
	}

	#[test]
	fn comma_separated_joins_without_trailing_separator() {
		assert_eq!(comma_separated::<_, &str>([]), "");
		assert_eq!(comma_separated(["alpha"]), "alpha");
		assert_eq!(comma_separated(["alpha", "beta", "gamma"]), "alpha,beta,gamma");
	}
}
