//! Storage contract and built-in store for connected accounts.

pub mod memory;

pub use memory::MemoryAccountStore;

// self
use crate::{
	_prelude::*,
	auth::AccountId,
	connectors::{AccountStatus, AccountSyncConfig, ConnectedAccount},
};

/// Boxed future returned by [`AccountStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for connected accounts.
pub trait AccountStore
where
	Self: Send + Sync,
{
	/// Adds a newly connected account; fails with [`StoreError::Duplicate`] if the id exists.
	fn connect(&self, account: ConnectedAccount) -> StoreFuture<'_, ()>;

	/// Fetches one account.
	fn fetch<'a>(&'a self, id: &'a AccountId) -> StoreFuture<'a, Option<ConnectedAccount>>;

	/// Lists every account, ordered by id.
	fn list(&self) -> StoreFuture<'_, Vec<ConnectedAccount>>;

	/// Replaces an account's sync configuration and returns the updated record.
	fn update_sync_config<'a>(
		&'a self,
		id: &'a AccountId,
		config: AccountSyncConfig,
	) -> StoreFuture<'a, Option<ConnectedAccount>>;

	/// Sets an account's status. Moving to [`AccountStatus::Connected`] from
	/// [`AccountStatus::Syncing`] stamps `last_sync` with `instant`.
	fn set_status<'a>(
		&'a self,
		id: &'a AccountId,
		status: AccountStatus,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, Option<ConnectedAccount>>;

	/// Removes an account. Returns false when it was not present.
	fn disconnect<'a>(&'a self, id: &'a AccountId) -> StoreFuture<'a, bool>;
}

/// Error type produced by [`AccountStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// An account with the same id is already connected.
	#[error("Account {id} is already connected.")]
	Duplicate {
		/// Conflicting account id.
		id: AccountId,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
