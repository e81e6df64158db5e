// std
use std::sync::Arc;
// crates.io
use time::{Duration, OffsetDateTime};
// self
use plinth::{
	credential::{CredentialError, CredentialService},
	error::Error,
	secret::{MemorySecretStore, SecretStore, SecretStoreError},
	token::{CredentialTokenProvider, TokenProvider},
};

fn expiry() -> OffsetDateTime {
	OffsetDateTime::now_utc() + Duration::hours(1)
}

#[tokio::test]
async fn sign_in_store_produce_sign_out_cycle() {
	let credentials = CredentialService::new(Arc::new(MemorySecretStore::default()));

	// Sign-in persists the pair.
	credentials
		.store_credentials("access-abc", "refresh-def", expiry())
		.await
		.expect("Sign-in credentials should store.");

	// The provider produces the stored access credential as the bearer token.
	let provider = CredentialTokenProvider::new(credentials.clone());
	let token = provider.token().await.expect("Stored credential should back the provider.");

	assert_eq!(token.expose(), "access-abc");
	assert_eq!(
		credentials
			.refresh_token()
			.await
			.expect("Refresh credential should be readable.")
			.expose(),
		"refresh-def"
	);

	// Sign-out clears both slots; the provider turns into a typed error.
	credentials.reset().await;

	let e = provider.token().await.expect_err("Reset credentials should not produce a token.");

	assert!(matches!(e, Error::Credential(CredentialError::ItemNotFound)));
}

#[tokio::test]
async fn refresh_rotation_with_empty_access_clears_only_the_access_slot() {
	let credentials = CredentialService::new(Arc::new(MemorySecretStore::default()));

	credentials
		.store_credentials("access-abc", "refresh-def", expiry())
		.await
		.expect("Initial pair should store.");
	// A rotation that only returns a refresh credential blanks the access slot.
	credentials
		.store_credentials("", "refresh-ghi", expiry())
		.await
		.expect("Rotation with an empty access credential should succeed.");

	assert_eq!(credentials.access_token().await, Err(CredentialError::ItemNotFound));
	assert_eq!(
		credentials
			.refresh_token()
			.await
			.expect("Rotated refresh credential should be readable.")
			.expose(),
		"refresh-ghi"
	);
}

#[tokio::test]
async fn credentials_are_isolated_per_store() {
	let first = CredentialService::new(Arc::new(MemorySecretStore::default()));
	let second = CredentialService::new(Arc::new(MemorySecretStore::default()));

	first
		.store_credentials("access-abc", "refresh-def", expiry())
		.await
		.expect("Credentials should store.");

	assert!(first.access_token().await.is_ok());
	assert_eq!(second.access_token().await, Err(CredentialError::ItemNotFound));
}

#[tokio::test]
async fn raw_store_bytes_surface_as_conversion_errors() {
	let store = MemorySecretStore::default();
	let credentials = CredentialService::new(Arc::new(store.clone()));

	store
		.set("access_token", &[0xC3, 0x28])
		.await
		.expect("Raw bytes should store directly.");

	assert_eq!(
		credentials.access_token().await,
		Err(CredentialError::UnableToConvertToString)
	);
}

#[test]
fn secret_store_errors_fold_into_the_credential_taxonomy() {
	assert_eq!(
		CredentialError::from(SecretStoreError::Rejected { message: "value too long".into() }),
		CredentialError::BadData
	);
	assert_eq!(
		CredentialError::from(SecretStoreError::Platform { message: "keychain locked".into() }),
		CredentialError::ServicesError { message: "keychain locked".into() }
	);
}
