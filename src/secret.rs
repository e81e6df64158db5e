//! Secret storage contract and built-in secure-store implementations.

pub mod keyring;
pub mod memory;

pub use keyring::KeyringStore;
pub use memory::MemorySecretStore;

// self
use crate::_prelude::*;

/// Future type returned by [`SecretStore`] implementations.
pub type SecretFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, SecretStoreError>> + 'a + Send>>;

/// Opaque secure key-value store addressed by named slots.
///
/// Implementations serialize their own platform access; this crate layers no
/// additional locking over them. `set` is an upsert, `get` reports an absent
/// slot as `None` rather than an error, and `delete` of an absent slot succeeds
/// so teardown stays idempotent.
pub trait SecretStore
where
	Self: Send + Sync,
{
	/// Stores or replaces the secret under the slot.
	fn set<'a>(&'a self, slot: &'a str, value: &'a [u8]) -> SecretFuture<'a, ()>;

	/// Fetches the secret stored under the slot.
	fn get<'a>(&'a self, slot: &'a str) -> SecretFuture<'a, Option<Vec<u8>>>;

	/// Removes the secret stored under the slot, if any.
	fn delete<'a>(&'a self, slot: &'a str) -> SecretFuture<'a, ()>;
}

/// Error type shared by [`SecretStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SecretStoreError {
	/// The store refused the value itself, e.g. it was too large or malformed.
	#[error("Secret value was rejected by the store, {message}.")]
	Rejected {
		/// Store-supplied reason.
		message: String,
	},
	/// The underlying platform store reported a failure.
	#[error("Platform secret store failed, {message}.")]
	Platform {
		/// Native status or message from the platform store.
		message: String,
	},
}
