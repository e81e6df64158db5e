//! Shared configuration cache with a remote-then-local fallback chain.

// self
use crate::{
	_prelude::*,
	config::{AppConfig, CacheStrategy, ConfigLoader},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Cache handle specialized to the crate's own configuration shape.
pub type AppConfigCache = ConfigCache<AppConfig>;

struct Collaborators<C> {
	remote: Arc<dyn ConfigLoader<C>>,
	local: Arc<dyn ConfigLoader<C>>,
	strategy: Arc<dyn CacheStrategy>,
}

/// Cached value and the instant it was stored.
///
/// Writers always set both fields under one guard, so a timestamp without a
/// configuration (or the reverse) is never observable.
struct CacheState<C> {
	config: Option<C>,
	loaded_at: Option<OffsetDateTime>,
}
impl<C> CacheState<C> {
	const fn empty() -> Self {
		Self { config: None, loaded_at: None }
	}
}

struct CacheInner<C> {
	collaborators: RwLock<Collaborators<C>>,
	state: RwLock<CacheState<C>>,
	single_flight: Option<AsyncMutex<()>>,
}

/// Process-wide configuration cache.
///
/// Handles are cheap to clone and all clones share one cache line, so an
/// application constructs the cache once and passes handles to whatever needs
/// configuration access. Locks are only held for field access, never across a
/// loader await, so concurrent callers make independent progress unless the
/// handle was built with [`single_flight`](Self::single_flight).
pub struct ConfigCache<C> {
	inner: Arc<CacheInner<C>>,
}
impl<C> ConfigCache<C>
where
	C: Clone + Send + Sync,
{
	/// Creates a cache over the given loaders and freshness strategy.
	pub fn new(
		remote: Arc<dyn ConfigLoader<C>>,
		local: Arc<dyn ConfigLoader<C>>,
		strategy: Arc<dyn CacheStrategy>,
	) -> Self {
		Self::build(remote, local, strategy, false)
	}

	/// Like [`new`](Self::new), but serializes concurrent load attempts so one
	/// staleness window triggers at most one remote fetch.
	pub fn single_flight(
		remote: Arc<dyn ConfigLoader<C>>,
		local: Arc<dyn ConfigLoader<C>>,
		strategy: Arc<dyn CacheStrategy>,
	) -> Self {
		Self::build(remote, local, strategy, true)
	}

	fn build(
		remote: Arc<dyn ConfigLoader<C>>,
		local: Arc<dyn ConfigLoader<C>>,
		strategy: Arc<dyn CacheStrategy>,
		single_flight: bool,
	) -> Self {
		Self {
			inner: Arc::new(CacheInner {
				collaborators: RwLock::new(Collaborators { remote, local, strategy }),
				state: RwLock::new(CacheState::empty()),
				single_flight: single_flight.then(|| AsyncMutex::new(())),
			}),
		}
	}

	/// Returns the current configuration, consulting the loader chain when the
	/// cached copy is stale or absent.
	///
	/// When both loaders fail, the previously cached copy is returned unchanged
	/// (and its timestamp stays put, so the next call retries the chain). Only
	/// a cache that has never loaded anything yields `None`.
	pub async fn config(&self) -> Option<C> {
		let span = OpSpan::new(OpKind::ConfigLoad, "config");

		obs::record_op_outcome(OpKind::ConfigLoad, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				match &self.inner.single_flight {
					Some(gate) => {
						let _load = gate.lock().await;

						self.load_if_stale().await
					},
					None => self.load_if_stale().await,
				}
			})
			.await;

		match &result {
			Some(_) => obs::record_op_outcome(OpKind::ConfigLoad, OpOutcome::Success),
			None => obs::record_op_outcome(OpKind::ConfigLoad, OpOutcome::Failure),
		}

		result
	}

	/// Replaces both loaders and the freshness strategy, clearing the cached
	/// state.
	///
	/// The next [`config`](Self::config) call goes through the new loader chain
	/// from scratch. This is primarily a seam for tests that share a
	/// process-wide handle; production code usually builds a fresh cache
	/// instead.
	pub fn reset_with(
		&self,
		remote: Arc<dyn ConfigLoader<C>>,
		local: Arc<dyn ConfigLoader<C>>,
		strategy: Arc<dyn CacheStrategy>,
	) {
		*self.inner.collaborators.write() = Collaborators { remote, local, strategy };
		*self.inner.state.write() = CacheState::empty();
	}

	async fn load_if_stale(&self) -> Option<C> {
		if let Some(config) = self.fresh_cached() {
			return Some(config);
		}

		let (remote, local) = {
			let collaborators = self.inner.collaborators.read();

			(collaborators.remote.clone(), collaborators.local.clone())
		};

		if let Some(config) = remote.load().await {
			self.store(config.clone());

			return Some(config);
		}
		if let Some(config) = local.load().await {
			self.store(config.clone());

			return Some(config);
		}

		self.inner.state.read().config.clone()
	}

	// Locks are taken strictly one at a time here; holding the state guard
	// while consulting the strategy could deadlock against `reset_with`.
	fn fresh_cached(&self) -> Option<C> {
		let (config, loaded_at) = {
			let state = self.inner.state.read();

			(state.config.clone(), state.loaded_at)
		};
		let loaded_at = loaded_at?;
		let reload = self.inner.collaborators.read().strategy.should_reload(Some(loaded_at));

		if reload { None } else { config }
	}

	fn store(&self, config: C) {
		let mut state = self.inner.state.write();

		state.config = Some(config);
		state.loaded_at = Some(OffsetDateTime::now_utc());
	}
}
impl<C> Clone for ConfigCache<C> {
	fn clone(&self) -> Self {
		Self { inner: Arc::clone(&self.inner) }
	}
}
impl<C> Debug for ConfigCache<C> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.inner.state.read();

		f.debug_struct("ConfigCache")
			.field("cached", &state.config.is_some())
			.field("loaded_at", &state.loaded_at)
			.field("single_flight", &self.inner.single_flight.is_some())
			.finish()
	}
}
