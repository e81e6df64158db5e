//! Demonstrates assembling the full substrate: bundled bootstrap settings, the cached remote
//! configuration, and an authenticated request signed with the configured anonymous token.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::Duration;
// self
use plinth::{
	bundle::StaticBundle,
	client::{ConfigUrlProvider, RequestClient},
	config::{
		AppConfig, ConfigCache, LocalConfigLoader, RemoteConfigLoader, TimeBasedStrategy,
	},
	credential::CredentialService,
	http::ReqwestTransport,
	secret::MemorySecretStore,
	token::{ConfigTokenProvider, CredentialTokenProvider, DynamicTokenProvider},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let config_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/config/basketbuddy")
				.header("authorization", "Bearer demo-config-key");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"data\":{{\"config\":{{\"apiUrl\":\"{}\",\"anonToken\":\"demo-anon\",\"minAppVersion\":\"1.0.0\"}}}}}}",
				server.base_url(),
			));
		})
		.await;
	let users_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/users").header("authorization", "Bearer demo-anon");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":1,\"name\":\"ada\"}]");
		})
		.await;
	let bundle = Arc::new(
		StaticBundle::new()
			.with(
				"bootstrap",
				"json",
				format!(
					"{{\"configApiUrl\":\"{}\",\"configApiToken\":\"demo-config-key\",\"productId\":\"basketbuddy\"}}",
					server.base_url(),
				)
				.into_bytes(),
			)
			.with(
				"default_config",
				"json",
				"{\"apiUrl\":\"https://fallback.example.com\"}".as_bytes(),
			),
	);
	let transport = Arc::new(ReqwestTransport::default());
	let cache = ConfigCache::new(
		Arc::new(<RemoteConfigLoader<AppConfig>>::new(bundle.clone(), transport.clone())),
		Arc::new(<LocalConfigLoader<AppConfig>>::new(bundle)),
		Arc::new(TimeBasedStrategy::new(Duration::seconds(300))),
	);
	let config = cache.config().await.expect("The mocked endpoint serves a configuration.");

	println!(
		"Minimum supported app version: {}.",
		config.min_app_version.as_deref().unwrap_or("?")
	);

	let credentials = CredentialService::new(Arc::new(MemorySecretStore::default()));
	let tokens = DynamicTokenProvider::new(
		Arc::new(ConfigTokenProvider::new(cache.clone())),
		Arc::new(CredentialTokenProvider::new(credentials)),
	);
	let client =
		RequestClient::with_transport(Arc::new(ConfigUrlProvider::new(cache)), tokens, transport);
	let url = client.create_url("/users").await?;
	let (body, metadata) = client.get(url, None).await?;

	println!("GET /users -> {} ({} bytes).", metadata.status, body.len());

	config_mock.assert_async().await;
	users_mock.assert_async().await;

	Ok(())
}
