//! Thread-safe in-memory [`SecretStore`] for tests and local development.

// self
use crate::{
	_prelude::*,
	secret::{SecretFuture, SecretStore},
};

type SlotMap = Arc<RwLock<HashMap<String, Vec<u8>>>>;

/// Store that keeps secrets in process memory.
///
/// Clones share one slot map. Nothing is persisted and nothing is protected
/// beyond process isolation, which is exactly what tests and demos want.
#[derive(Clone, Default)]
pub struct MemorySecretStore(SlotMap);
impl Debug for MemorySecretStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let slots = self.0.read().keys().cloned().collect::<Vec<_>>();

		f.debug_struct("MemorySecretStore").field("slots", &slots).finish()
	}
}
impl SecretStore for MemorySecretStore {
	fn set<'a>(&'a self, slot: &'a str, value: &'a [u8]) -> SecretFuture<'a, ()> {
		let slots = self.0.clone();

		Box::pin(async move {
			slots.write().insert(slot.to_owned(), value.to_vec());

			Ok(())
		})
	}

	fn get<'a>(&'a self, slot: &'a str) -> SecretFuture<'a, Option<Vec<u8>>> {
		let slots = self.0.clone();

		Box::pin(async move { Ok(slots.read().get(slot).cloned()) })
	}

	fn delete<'a>(&'a self, slot: &'a str) -> SecretFuture<'a, ()> {
		let slots = self.0.clone();

		Box::pin(async move {
			slots.write().remove(slot);

			Ok(())
		})
	}
}
