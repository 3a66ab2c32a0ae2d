//! Fault-injecting account store for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::account::{Account, AccountId};

use super::{AccountStore, StoreError, in_memory::InMemoryAccountStore};

type UpdateFault = Box<dyn Fn(&Account, usize) -> bool + Send + Sync>;

/// Wraps [`InMemoryAccountStore`], failing the updates selected by a
/// predicate over the account and the zero-based update call index.
pub(crate) struct FaultyAccountStore {
    pub inner: InMemoryAccountStore,
    fail_update: UpdateFault,
    reads: AtomicUsize,
    updates: AtomicUsize,
}

impl FaultyAccountStore {
    pub fn new(fail_update: impl Fn(&Account, usize) -> bool + Send + Sync + 'static) -> Self {
        Self {
            inner: InMemoryAccountStore::new(),
            fail_update: Box::new(fail_update),
            reads: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn reliable() -> Self {
        Self::new(|_, _| false)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl AccountStore for FaultyAccountStore {
    fn create(&self, account: &Account) -> Result<(), StoreError> {
        self.inner.create(account)
    }

    fn read(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(id)
    }

    fn update(&self, account: &mut Account) -> Result<(), StoreError> {
        let call = self.updates.fetch_add(1, Ordering::SeqCst);
        if (self.fail_update)(account, call) {
            return Err(StoreError::Backend("test error".to_string()));
        }
        self.inner.update(account)
    }
}
