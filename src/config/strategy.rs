//! Freshness strategies deciding when the cache goes back to its loaders.

// self
use crate::_prelude::*;

/// Strategy hook deciding whether the cached configuration is still usable.
///
/// Implementations stay synchronous and side-effect free so the cache can
/// consult them inline. `None` means nothing has ever been loaded; every
/// sensible strategy requests a load then.
pub trait CacheStrategy
where
	Self: Send + Sync,
{
	/// Returns `true` when a fresh configuration should be fetched.
	fn should_reload(&self, loaded_at: Option<OffsetDateTime>) -> bool;
}

/// Wall-clock strategy that reloads once the cached copy exceeds a fixed age.
///
/// A copy exactly at the maximum age is still considered fresh; only strictly
/// older copies trigger a reload.
#[derive(Clone, Debug)]
pub struct TimeBasedStrategy {
	max_age: Duration,
}
impl TimeBasedStrategy {
	/// Default maximum cache age.
	pub const DEFAULT_MAX_AGE: Duration = Duration::seconds(300);

	/// Creates a strategy with a custom maximum cache age.
	pub fn new(max_age: Duration) -> Self {
		Self { max_age }
	}
}
impl Default for TimeBasedStrategy {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MAX_AGE)
	}
}
impl CacheStrategy for TimeBasedStrategy {
	fn should_reload(&self, loaded_at: Option<OffsetDateTime>) -> bool {
		match loaded_at {
			Some(instant) => OffsetDateTime::now_utc() - instant > self.max_age,
			None => true,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn reloads_when_never_loaded() {
		assert!(TimeBasedStrategy::default().should_reload(None));
	}

	#[test]
	fn keeps_recent_copy() {
		let strategy = TimeBasedStrategy::default();
		let just_now = OffsetDateTime::now_utc();

		assert!(!strategy.should_reload(Some(just_now)));
	}

	#[test]
	fn reloads_expired_copy() {
		let strategy = TimeBasedStrategy::new(Duration::seconds(300));
		let stale = OffsetDateTime::now_utc() - Duration::seconds(301);

		assert!(strategy.should_reload(Some(stale)));
	}

	#[test]
	fn boundary_age_is_still_fresh() {
		let strategy = TimeBasedStrategy::new(Duration::hours(1));
		// Comfortably inside the window even after test-runner scheduling delays.
		let within = OffsetDateTime::now_utc() - Duration::minutes(59);

		assert!(!strategy.should_reload(Some(within)));
	}
}
