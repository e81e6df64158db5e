//! Bearer-token production: config-backed, credential-backed, and state-dispatched.

// self
use crate::{
	_prelude::*,
	config::AppConfigCache,
	credential::CredentialService,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Future type returned by [`TokenProvider`] implementations.
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenSecret>> + 'a + Send>>;

/// Redacted bearer-token wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Capability to produce the bearer token for outbound requests.
pub trait TokenProvider
where
	Self: Send + Sync,
{
	/// Produces a bearer token.
	fn token(&self) -> TokenFuture<'_>;
}

/// Identity the substrate currently operates under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
	/// No user is signed in; requests carry the configured anonymous token.
	#[default]
	Anonymous,
	/// A user is signed in; requests carry the stored access credential.
	Authenticated,
}
impl AuthState {
	/// Stable label used in spans and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Anonymous => "anonymous",
			Self::Authenticated => "authenticated",
		}
	}
}
impl Display for AuthState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token provider backed by the cached configuration's anonymous token.
#[derive(Clone, Debug)]
pub struct ConfigTokenProvider {
	cache: AppConfigCache,
}
impl ConfigTokenProvider {
	/// Creates a provider over the given cache handle.
	pub fn new(cache: AppConfigCache) -> Self {
		Self { cache }
	}
}
impl TokenProvider for ConfigTokenProvider {
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(async move {
			self.cache
				.config()
				.await
				.and_then(|config| config.anon_token)
				.ok_or(Error::TokenNotConfigured)
		})
	}
}

/// Token provider backed by the stored access credential.
#[derive(Clone, Debug)]
pub struct CredentialTokenProvider {
	credentials: CredentialService,
}
impl CredentialTokenProvider {
	/// Creates a provider over the given credential service.
	pub fn new(credentials: CredentialService) -> Self {
		Self { credentials }
	}
}
impl TokenProvider for CredentialTokenProvider {
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(async move { Ok(self.credentials.access_token().await?) })
	}
}

/// Token provider that dispatches on the current [`AuthState`].
///
/// Exactly one of the two underlying providers is consulted per call. The
/// state is sampled when the returned future actually runs, so a request built
/// before a state switch but produced after it observes the new state.
pub struct DynamicTokenProvider {
	anonymous: Arc<dyn TokenProvider>,
	authenticated: Arc<dyn TokenProvider>,
	state: RwLock<AuthState>,
}
impl DynamicTokenProvider {
	/// Creates a provider starting in the [`AuthState::Anonymous`] state.
	pub fn new(anonymous: Arc<dyn TokenProvider>, authenticated: Arc<dyn TokenProvider>) -> Self {
		Self { anonymous, authenticated, state: RwLock::new(AuthState::default()) }
	}

	/// State the next [`token`](Self::token) call will dispatch on.
	pub fn auth_state(&self) -> AuthState {
		*self.state.read()
	}

	/// Switches the active identity immediately.
	///
	/// Any transition is legal, including re-entering the current state.
	pub fn set_auth_state(&self, state: AuthState) {
		*self.state.write() = state;
	}
}
impl Debug for DynamicTokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DynamicTokenProvider").field("state", &self.auth_state()).finish()
	}
}
impl TokenProvider for DynamicTokenProvider {
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(async move {
			let state = self.auth_state();
			let span = OpSpan::new(OpKind::Token, state.as_str());
			let provider = match state {
				AuthState::Anonymous => self.anonymous.clone(),
				AuthState::Authenticated => self.authenticated.clone(),
			};

			obs::record_op_outcome(OpKind::Token, OpOutcome::Attempt);

			let result = span.instrument(async move { provider.token().await }).await;

			match &result {
				Ok(_) => obs::record_op_outcome(OpKind::Token, OpOutcome::Success),
				Err(_) => obs::record_op_outcome(OpKind::Token, OpOutcome::Failure),
			}

			result
		})
	}
}
