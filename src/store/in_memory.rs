use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use crate::{
    account::{Account, AccountId},
    transaction::Transaction,
};

use super::{AccountStore, StoreError, TransactionStore};

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

/// In-memory account store.
///
/// Intended for tests and the CSV front-end. Account names are unique.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all accounts, in no particular order.
    pub fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        Ok(accounts.values().cloned().collect())
    }
}

impl AccountStore for InMemoryAccountStore {
    fn create(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        if accounts.contains_key(&account.id) || accounts.values().any(|a| a.name == account.name)
        {
            return Err(StoreError::DuplicateAccount {
                id: account.id,
                name: account.name.clone(),
            });
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    fn read(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        Ok(accounts.get(&id).cloned())
    }

    fn update(&self, account: &mut Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        let stored = accounts
            .get_mut(&account.id)
            .ok_or(StoreError::MissingAccount(account.id))?;
        if stored.version != account.version {
            return Err(StoreError::Conflict {
                id: account.id,
                expected: account.version,
                found: stored.version,
            });
        }
        account.version += 1;
        *stored = account.clone();
        Ok(())
    }
}

/// In-memory append-only transaction log.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let transactions = self.transactions.read().map_err(poisoned)?;
        Ok(transactions.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of the log in append order.
    pub fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let transactions = self.transactions.read().map_err(poisoned)?;
        Ok(transactions.clone())
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn create(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut transactions = self.transactions.write().map_err(poisoned)?;
        transactions.push(transaction.clone());
        Ok(())
    }
}
