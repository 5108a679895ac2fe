//! Thread-safe in-memory [`AccountStore`] implementation for the dashboard session and tests.

// self
use crate::{
	_prelude::*,
	auth::AccountId,
	connectors::{AccountStatus, AccountSyncConfig, ConnectedAccount},
	store::{AccountStore, StoreError, StoreFuture},
};

type AccountMap = Arc<RwLock<HashMap<AccountId, ConnectedAccount>>>;

/// Storage backend that keeps accounts in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryAccountStore(AccountMap);
impl MemoryAccountStore {
	fn connect_now(map: AccountMap, account: ConnectedAccount) -> Result<(), StoreError> {
		let mut guard = map.write();

		if guard.contains_key(&account.id) {
			return Err(StoreError::Duplicate { id: account.id });
		}

		guard.insert(account.id.clone(), account);

		Ok(())
	}

	fn list_now(map: AccountMap) -> Vec<ConnectedAccount> {
		let mut accounts = map.read().values().cloned().collect::<Vec<_>>();

		accounts.sort_by(|a, b| a.id.cmp(&b.id));

		accounts
	}

	fn update_now(
		map: AccountMap,
		id: AccountId,
		update: impl FnOnce(&mut ConnectedAccount),
	) -> Option<ConnectedAccount> {
		let mut guard = map.write();
		let account = guard.get_mut(&id)?;

		update(account);

		Some(account.clone())
	}
}
impl AccountStore for MemoryAccountStore {
	fn connect(&self, account: ConnectedAccount) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::connect_now(map, account) })
	}

	fn fetch<'a>(&'a self, id: &'a AccountId) -> StoreFuture<'a, Option<ConnectedAccount>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(id).cloned()) })
	}

	fn list(&self) -> StoreFuture<'_, Vec<ConnectedAccount>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::list_now(map)) })
	}

	fn update_sync_config<'a>(
		&'a self,
		id: &'a AccountId,
		config: AccountSyncConfig,
	) -> StoreFuture<'a, Option<ConnectedAccount>> {
		let map = self.0.clone();
		let id = id.to_owned();

		Box::pin(async move {
			Ok(Self::update_now(map, id, |account| account.sync_config = config))
		})
	}

	fn set_status<'a>(
		&'a self,
		id: &'a AccountId,
		status: AccountStatus,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, Option<ConnectedAccount>> {
		let map = self.0.clone();
		let id = id.to_owned();

		Box::pin(async move {
			Ok(Self::update_now(map, id, |account| {
				if account.status == AccountStatus::Syncing && status == AccountStatus::Connected {
					account.last_sync = Some(instant);
				}

				account.status = status;
			}))
		})
	}

	fn disconnect<'a>(&'a self, id: &'a AccountId) -> StoreFuture<'a, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove(id).is_some()) })
	}
}
