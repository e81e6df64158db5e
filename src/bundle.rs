//! Bundled-resource access backing the local configuration fallback and bootstrap settings.

// std
use std::{
	borrow::Cow,
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	obs::{self, OpKind},
};

/// Future type returned by [`ResourceBundle`] implementations.
pub type BundleFuture<'a> = Pin<Box<dyn Future<Output = Option<Vec<u8>>> + 'a + Send>>;

/// Read-only access to resources shipped alongside the application.
///
/// Lookups are keyed by resource name plus extension, mirroring how platform
/// bundles address their contents. Missing resources and unreadable resources
/// are both reported as `None`; the loaders built on top fall back either way.
pub trait ResourceBundle
where
	Self: Send + Sync,
{
	/// Reads the raw bytes of `{name}.{extension}`, if present.
	fn read<'a>(&'a self, name: &'a str, extension: &'a str) -> BundleFuture<'a>;
}

/// Bundle backed by a resource directory on disk.
#[derive(Clone, Debug)]
pub struct DirBundle {
	root: PathBuf,
}
impl DirBundle {
	/// Creates a bundle rooted at the provided directory.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Returns the directory this bundle resolves resources against.
	pub fn root(&self) -> &Path {
		&self.root
	}

	fn read_now(&self, name: &str, extension: &str) -> Option<Vec<u8>> {
		let path = self.root.join(format!("{name}.{extension}"));

		match fs::read(&path) {
			Ok(bytes) => Some(bytes),
			// A resource that simply is not shipped is an expected miss.
			Err(e) if e.kind() == ErrorKind::NotFound => None,
			Err(e) => {
				obs::record_absorbed_failure(OpKind::ConfigLoad, "bundle_read", &e);

				None
			},
		}
	}
}
impl ResourceBundle for DirBundle {
	fn read<'a>(&'a self, name: &'a str, extension: &'a str) -> BundleFuture<'a> {
		Box::pin(async move { self.read_now(name, extension) })
	}
}

/// Bundle backed by byte slices embedded at compile time.
///
/// Typically populated with [`include_bytes!`] so the binary stays
/// self-contained; tests use it to supply fixture resources without touching
/// the filesystem.
#[derive(Clone, Debug, Default)]
pub struct StaticBundle {
	resources: HashMap<(String, String), Cow<'static, [u8]>>,
}
impl StaticBundle {
	/// Creates an empty bundle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or replaces) the resource registered under `{name}.{extension}`.
	pub fn with(
		mut self,
		name: impl Into<String>,
		extension: impl Into<String>,
		bytes: impl Into<Cow<'static, [u8]>>,
	) -> Self {
		self.resources.insert((name.into(), extension.into()), bytes.into());

		self
	}
}
impl ResourceBundle for StaticBundle {
	fn read<'a>(&'a self, name: &'a str, extension: &'a str) -> BundleFuture<'a> {
		let bytes =
			self.resources.get(&(name.to_owned(), extension.to_owned())).map(|b| b.to_vec());

		Box::pin(async move { bytes })
	}
}
