//! Platform-keychain [`SecretStore`] built on the `keyring` crate.

// crates.io
use keyring::{Entry, Error as KeyringError};
// self
use crate::{
	_prelude::*,
	secret::{SecretFuture, SecretStore, SecretStoreError},
};

/// Store that persists secrets in the operating system's credential service.
///
/// Each slot maps to one keyring entry under the service identifier supplied at
/// construction, so applications (and test runs) isolate themselves by picking
/// distinct service names. Platform access in the `keyring` crate is a short
/// blocking call; it is performed inline rather than on a blocking pool,
/// matching how the platform serializes keychain access anyway.
#[derive(Clone, Debug)]
pub struct KeyringStore {
	service: String,
}
impl KeyringStore {
	/// Creates a store scoped to the given service identifier.
	pub fn new(service: impl Into<String>) -> Self {
		Self { service: service.into() }
	}

	/// Service identifier this store is scoped to.
	pub fn service(&self) -> &str {
		&self.service
	}

	fn entry(&self, slot: &str) -> Result<Entry, SecretStoreError> {
		Entry::new(&self.service, slot).map_err(map_error)
	}
}
impl SecretStore for KeyringStore {
	fn set<'a>(&'a self, slot: &'a str, value: &'a [u8]) -> SecretFuture<'a, ()> {
		Box::pin(async move { self.entry(slot)?.set_secret(value).map_err(map_error) })
	}

	fn get<'a>(&'a self, slot: &'a str) -> SecretFuture<'a, Option<Vec<u8>>> {
		Box::pin(async move {
			match self.entry(slot)?.get_secret() {
				Ok(bytes) => Ok(Some(bytes)),
				Err(KeyringError::NoEntry) => Ok(None),
				Err(e) => Err(map_error(e)),
			}
		})
	}

	fn delete<'a>(&'a self, slot: &'a str) -> SecretFuture<'a, ()> {
		Box::pin(async move {
			match self.entry(slot)?.delete_credential() {
				Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
				Err(e) => Err(map_error(e)),
			}
		})
	}
}

fn map_error(e: KeyringError) -> SecretStoreError {
	let message = e.to_string();

	match e {
		KeyringError::TooLong(..) | KeyringError::Invalid(..) =>
			SecretStoreError::Rejected { message },
		_ => SecretStoreError::Platform { message },
	}
}
