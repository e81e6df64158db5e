//! Access/refresh credential lifecycle over a secure secret store.

// self
use crate::{
	_prelude::*,
	secret::{SecretStore, SecretStoreError},
	token::TokenSecret,
};

/// Slot holding the short-lived access credential.
const ACCESS_TOKEN_SLOT: &str = "access_token";
/// Slot holding the longer-lived refresh credential.
const REFRESH_TOKEN_SLOT: &str = "refresh_token";

/// Error taxonomy surfaced by [`CredentialService`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CredentialError {
	/// The store refused the credential value.
	#[error("Credential value could not be stored.")]
	BadData,
	/// No credential is stored under the requested slot.
	#[error("Credential is not stored.")]
	ItemNotFound,
	/// The underlying secure store reported a failure.
	#[error("Secure store failed, {message}.")]
	ServicesError {
		/// Native status or message reported by the store.
		message: String,
	},
	/// Stored bytes could not be decoded back to text.
	#[error("Stored credential could not be decoded as text.")]
	UnableToConvertToString,
}
impl From<SecretStoreError> for CredentialError {
	fn from(e: SecretStoreError) -> Self {
		match e {
			SecretStoreError::Rejected { .. } => Self::BadData,
			SecretStoreError::Platform { message } => Self::ServicesError { message },
		}
	}
}

/// Stores and retrieves the access/refresh credential pair.
///
/// The service owns slot naming and text encoding; everything platform-specific
/// stays behind the [`SecretStore`] it wraps.
#[derive(Clone)]
pub struct CredentialService {
	store: Arc<dyn SecretStore>,
}
impl CredentialService {
	/// Creates a service over the given secret store.
	pub fn new(store: Arc<dyn SecretStore>) -> Self {
		Self { store }
	}

	/// Persists a credential pair issued by a sign-in or refresh.
	///
	/// The refresh credential is written first so that an interruption between
	/// the two writes leaves a recoverable session rather than a fresh access
	/// credential with no way to renew it. An empty string clears the
	/// corresponding slot instead of storing a literal empty credential.
	///
	/// The expiration instant is accepted for parity with sign-in responses but
	/// is not persisted; nothing reads it back.
	pub async fn store_credentials(
		&self,
		access: &str,
		refresh: &str,
		expires_at: OffsetDateTime,
	) -> Result<(), CredentialError> {
		#[cfg(feature = "tracing")]
		tracing::debug!(expires_at = %expires_at, "Storing credential pair.");
		#[cfg(not(feature = "tracing"))]
		let _ = expires_at;

		self.store_or_clear(REFRESH_TOKEN_SLOT, refresh).await?;
		self.store_or_clear(ACCESS_TOKEN_SLOT, access).await?;

		Ok(())
	}

	/// Fetches the stored access credential.
	pub async fn access_token(&self) -> Result<TokenSecret, CredentialError> {
		self.read_slot(ACCESS_TOKEN_SLOT).await
	}

	/// Fetches the stored refresh credential.
	pub async fn refresh_token(&self) -> Result<TokenSecret, CredentialError> {
		self.read_slot(REFRESH_TOKEN_SLOT).await
	}

	/// Deletes both credential slots.
	///
	/// Best-effort teardown for sign-out paths; failures are absorbed so a
	/// broken platform store cannot wedge the sign-out.
	pub async fn reset(&self) {
		let _ = self.store.delete(REFRESH_TOKEN_SLOT).await;
		let _ = self.store.delete(ACCESS_TOKEN_SLOT).await;
	}

	async fn store_or_clear(&self, slot: &str, value: &str) -> Result<(), CredentialError> {
		if value.is_empty() {
			self.store.delete(slot).await?;
		} else {
			self.store.set(slot, value.as_bytes()).await?;
		}

		Ok(())
	}

	async fn read_slot(&self, slot: &str) -> Result<TokenSecret, CredentialError> {
		let bytes = self.store.get(slot).await?.ok_or(CredentialError::ItemNotFound)?;
		let value =
			String::from_utf8(bytes).map_err(|_| CredentialError::UnableToConvertToString)?;

		Ok(TokenSecret::new(value))
	}
}
impl Debug for CredentialService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("CredentialService(..)")
	}
}
