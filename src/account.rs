use rust_decimal::{Decimal, prelude::Zero};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AccountId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub balance: Decimal,
    /// Optimistic concurrency stamp, owned by the store.
    #[serde(default)]
    pub version: u64,
}

impl Account {
    /// Opens a new account with a fresh id and zero balance.
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            balance: Decimal::zero(),
            version: 0,
        }
    }

    pub fn can_cover(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    pub fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Callers must check [`Account::can_cover`] first, the balance is not
    /// guarded here.
    pub fn debit(&mut self, amount: Decimal) {
        self.balance -= amount;
    }
}
