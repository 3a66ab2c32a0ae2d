use tracing::debug;

use crate::{
    account::{Account, AccountId},
    store::{AccountStore, StoreError},
};

/// Exposes account create/read/update to the operation handlers.
///
/// This is a pass-through, all validation lives either in the handlers or in
/// the store.
#[derive(Debug, Default)]
pub struct AccountService<S> {
    store: S,
}

impl<S> AccountService<S>
where
    S: AccountStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create(&self, account: &Account) -> Result<(), StoreError> {
        debug!(account_id = %account.id, name = %account.name, "create account");
        self.store.create(account)
    }

    pub fn read(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        debug!(account_id = %id, "read account");
        self.store.read(id)
    }

    pub fn update(&self, account: &mut Account) -> Result<(), StoreError> {
        debug!(
            account_id = %account.id,
            balance = %account.balance,
            version = account.version,
            "update account"
        );
        self.store.update(account)
    }
}
