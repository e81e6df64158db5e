//! Transport primitives for outbound API calls.
//!
//! The module exposes [`HttpTransport`] alongside the request/response value
//! types so downstream crates can integrate custom HTTP clients. The contract
//! deliberately sticks to plain strings and byte buffers; nothing here depends
//! on a particular HTTP stack, and the default [`ReqwestTransport`] is just one
//! implementation behind the `reqwest` feature.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

pub(crate) const ACCEPT: &str = "Accept";
pub(crate) const APPLICATION_JSON: &str = "application/json";
pub(crate) const AUTHORIZATION: &str = "Authorization";
pub(crate) const CONTENT_TYPE: &str = "Content-Type";

/// Future type returned by [`HttpTransport`] implementations.
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing signed API requests.
///
/// The trait is this crate's only dependency on an HTTP stack. Implementations
/// must be `Send + Sync` so a single transport can be shared across request
/// clients, and the returned future must own whatever state it needs so it
/// stays `Send` for the lifetime of the in-flight call. Cancellation and
/// timeout policy belong to the implementation, not to this contract.
pub trait HttpTransport
where
	Self: Send + Sync,
{
	/// Executes the request and collects the full response body.
	fn send(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// HTTP verbs issued by the request client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the canonical wire spelling of the verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// A fully assembled request handed to the transport.
#[derive(Clone)]
pub struct TransportRequest {
	/// Verb to issue.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Request body, when one was supplied by the caller.
	pub body: Option<Vec<u8>>,
}
impl Debug for TransportRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers: Vec<(&str, &str)> = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case(AUTHORIZATION) {
					(name.as_str(), "<redacted>")
				} else {
					(name.as_str(), value.as_str())
				}
			})
			.collect();

		f.debug_struct("TransportRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Response surface returned to callers alongside the body bytes.
///
/// This crate performs no status interpretation of its own; callers inspect the
/// status and headers themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint.
	pub status: u16,
	/// Response header name/value pairs.
	pub headers: Vec<(String, String)>,
}

/// Body bytes plus response metadata produced by a transport.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// Raw response body.
	pub body: Vec<u8>,
	/// Status and headers of the response.
	pub metadata: ResponseMetadata,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The wrapper imposes no policy of its own; configure redirects, timeouts, and
/// TLS on the inner [`ReqwestClient`] before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(request.method.into(), request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.map(|(name, value)| {
					(
						name.as_str().to_owned(),
						String::from_utf8_lossy(value.as_bytes()).into_owned(),
					)
				})
				.collect();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(TransportResponse { body, metadata: ResponseMetadata { status, headers } })
		})
	}
}
