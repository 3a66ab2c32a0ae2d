use thiserror::Error;

use crate::{
    account::{Account, AccountId},
    transaction::Transaction,
};

pub mod in_memory;

#[cfg(test)]
pub(crate) mod faulty;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("There is already an account with id {id} or name `{name}`")]
    DuplicateAccount { id: AccountId, name: String },
    #[error("Account {0} does not exist")]
    MissingAccount(AccountId),
    #[error("Account {id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        id: AccountId,
        expected: u64,
        found: u64,
    },
    #[error("Storage failure: {0}")]
    Backend(String),
}

/// Durable key -> record mapping for accounts.
pub trait AccountStore {
    fn create(&self, account: &Account) -> Result<(), StoreError>;

    /// `Ok(None)` means the lookup succeeded and there is no such account.
    fn read(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Compare-and-swap on [`Account::version`]. On success the stored
    /// version is bumped and written back into `account`.
    fn update(&self, account: &mut Account) -> Result<(), StoreError>;
}

/// Append-only record of completed transactions.
pub trait TransactionStore {
    fn create(&self, transaction: &Transaction) -> Result<(), StoreError>;
}
