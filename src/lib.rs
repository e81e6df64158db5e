//! Client-side configuration and authentication substrate: a cached remote configuration with
//! bundled fallbacks, keyring-backed credentials, and bearer-signed API requests in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod bundle;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod obs;
pub mod secret;
pub mod token;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
