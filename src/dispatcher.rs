use std::str::FromStr;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    account::Account,
    config::LedgerConfig,
    event::{Event, EventError},
    service::AccountService,
    store::{AccountStore, StoreError, TransactionStore},
    transaction::{Transaction, TransactionId, TransactionKind},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Invalid transaction type `{0}`")]
    InvalidTransactionType(String),
    #[error("Transfer requires a destination account other than the source")]
    InvalidTransactionDestination,
    #[error(transparent)]
    Event(#[from] EventError),
    /// The account mutation was applied, only the record is missing.
    #[error("Transaction {transaction_id} was applied but its record was not persisted: {cause}")]
    RecordNotPersisted {
        transaction_id: TransactionId,
        #[source]
        cause: StoreError,
    },
}

/// Selects and runs the operation for a submitted transaction, then records it.
#[derive(Debug)]
pub struct TransactionDispatcher<S, T> {
    accounts: AccountService<S>,
    transactions: T,
    config: LedgerConfig,
}

impl<S, T> TransactionDispatcher<S, T>
where
    S: AccountStore,
    T: TransactionStore,
{
    pub fn new(accounts: AccountService<S>, transactions: T, config: LedgerConfig) -> Self {
        Self {
            accounts,
            transactions,
            config,
        }
    }

    pub fn accounts(&self) -> &AccountService<S> {
        &self.accounts
    }

    pub fn transactions(&self) -> &T {
        &self.transactions
    }

    /// Runs an event that is not recorded as a transaction (`create`, `balance`).
    pub fn run(&self, event: &Event) -> Result<Account, EventError> {
        event.process(&self.accounts)
    }

    /// Applies `transaction` and persists its record.
    ///
    /// On success the transaction is stamped in place with a fresh id and the
    /// current time. A failed operation leaves no record.
    pub fn submit(&self, transaction: &mut Transaction) -> Result<Account, DispatchError> {
        let event = Self::select_event(transaction).inspect_err(|err| {
            warn!(kind = %transaction.kind, account_id = %transaction.account_id, %err, "transaction rejected");
        })?;

        let result = event.process(&self.accounts);
        if self.is_large_deposit(&event) {
            if result.is_ok() {
                info!(amount = %transaction.amount, account_id = %transaction.account_id, "large deposit processed successfully");
            } else {
                info!(amount = %transaction.amount, account_id = %transaction.account_id, "large deposit failed to process");
            }
        }
        let account = result.inspect_err(|err| {
            warn!(kind = %transaction.kind, account_id = %transaction.account_id, %err, "transaction failed");
        })?;

        let transaction_id = TransactionId::now_v7();
        transaction.transaction_id = Some(transaction_id);
        transaction.timestamp = Some(Utc::now());

        if let Err(cause) = self.transactions.create(transaction) {
            error!(%transaction_id, %cause, "transaction applied but not recorded");
            return Err(DispatchError::RecordNotPersisted {
                transaction_id,
                cause,
            });
        }

        info!(
            %transaction_id,
            kind = %transaction.kind,
            account_id = %transaction.account_id,
            amount = %transaction.amount,
            "transaction recorded"
        );
        Ok(account)
    }

    fn select_event(transaction: &mut Transaction) -> Result<Event, DispatchError> {
        let kind = TransactionKind::from_str(&transaction.kind)
            .map_err(|err| DispatchError::InvalidTransactionType(err.0))?;
        match kind {
            TransactionKind::Deposit => {
                transaction.destination_id = None;
                Ok(Event::deposit(transaction.account_id, transaction.amount))
            }
            TransactionKind::Withdraw => {
                transaction.destination_id = None;
                Ok(Event::withdraw(transaction.account_id, transaction.amount))
            }
            TransactionKind::Transfer => match transaction.destination_id {
                Some(destination_id) if destination_id != transaction.account_id => Ok(
                    Event::transfer(transaction.account_id, destination_id, transaction.amount),
                ),
                _ => Err(DispatchError::InvalidTransactionDestination),
            },
            TransactionKind::Create | TransactionKind::Balance => {
                Err(DispatchError::InvalidTransactionType(kind.to_string()))
            }
        }
    }

    fn is_large_deposit(&self, event: &Event) -> bool {
        matches!(event, Event::Deposit { amount, .. } if *amount > self.config.large_deposit_threshold)
    }
}
