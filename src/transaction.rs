use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::AccountId;

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Create,
    Deposit,
    Withdraw,
    Transfer,
    Balance,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Create => "create",
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Balance => "balance",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransactionKind(pub String);

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(TransactionKind::Create),
            "deposit" => Ok(TransactionKind::Deposit),
            "withdraw" => Ok(TransactionKind::Withdraw),
            "transfer" => Ok(TransactionKind::Transfer),
            "balance" => Ok(TransactionKind::Balance),
            other => Err(UnknownTransactionKind(other.to_string())),
        }
    }
}

/// A submitted balance mutation and, once applied, its persisted record.
///
/// `transaction_id` and `timestamp` are never supplied by the caller, the
/// dispatcher stamps them after the operation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
    pub account_id: AccountId,
    #[serde(default)]
    pub destination_id: Option<AccountId>,
    /// Raw type as submitted, parsed by the dispatcher.
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Decimal,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        kind: impl Into<String>,
        account_id: AccountId,
        destination_id: Option<AccountId>,
        amount: Decimal,
    ) -> Self {
        Self {
            transaction_id: None,
            account_id,
            destination_id,
            kind: kind.into(),
            amount,
            timestamp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind() {
        assert_eq!("deposit".parse::<TransactionKind>(), Ok(TransactionKind::Deposit));
        assert_eq!("withdraw".parse::<TransactionKind>(), Ok(TransactionKind::Withdraw));
        assert_eq!("transfer".parse::<TransactionKind>(), Ok(TransactionKind::Transfer));
        assert_eq!("create".parse::<TransactionKind>(), Ok(TransactionKind::Create));
        assert_eq!("balance".parse::<TransactionKind>(), Ok(TransactionKind::Balance));
        assert_eq!(
            "Deposit".parse::<TransactionKind>(),
            Err(UnknownTransactionKind("Deposit".to_string()))
        );
        assert_eq!(TransactionKind::Transfer.to_string(), "transfer");
    }

    #[test]
    fn new_transaction_is_unstamped() {
        let tx = Transaction::new("deposit", Uuid::now_v7(), None, Decimal::ONE);
        assert!(tx.transaction_id.is_none());
        assert!(tx.timestamp.is_none());
        assert_eq!(tx.kind, "deposit");
    }
}
