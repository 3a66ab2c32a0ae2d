use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    account::{Account, AccountId},
    service::AccountService,
    store::{AccountStore, StoreError},
    transaction::TransactionKind,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Account {0} not found")]
    NotFound(AccountId),
    #[error("Insufficient balance on account {account_id}: {balance} available, {requested} requested")]
    InsufficientBalance {
        account_id: AccountId,
        balance: Decimal,
        requested: Decimal,
    },
    #[error("Amount must not be negative for {kind}")]
    NegativeAmount { kind: TransactionKind },
    #[error("Cannot transfer from account {0} to itself")]
    SameAccountTransfer(AccountId),
    #[error(
        "Transfer of {amount} from {source_id} to {destination_id} debited the source but could not credit the destination: {cause}"
    )]
    PartialTransfer {
        source_id: AccountId,
        destination_id: AccountId,
        amount: Decimal,
        #[source]
        cause: StoreError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One unit of business logic reading or mutating account state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Create {
        name: String,
    },
    Balance {
        account_id: AccountId,
    },
    Deposit {
        account_id: AccountId,
        amount: Decimal,
    },
    Withdraw {
        account_id: AccountId,
        amount: Decimal,
    },
    Transfer {
        account_id: AccountId,
        destination_id: AccountId,
        amount: Decimal,
    },
}

impl Event {
    pub fn create(name: impl Into<String>) -> Self {
        Self::Create { name: name.into() }
    }

    pub fn balance(account_id: AccountId) -> Self {
        Self::Balance { account_id }
    }

    pub fn deposit(account_id: AccountId, amount: Decimal) -> Self {
        Self::Deposit { account_id, amount }
    }

    pub fn withdraw(account_id: AccountId, amount: Decimal) -> Self {
        Self::Withdraw { account_id, amount }
    }

    pub fn transfer(account_id: AccountId, destination_id: AccountId, amount: Decimal) -> Self {
        Self::Transfer {
            account_id,
            destination_id,
            amount,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Event::Create { .. } => TransactionKind::Create,
            Event::Balance { .. } => TransactionKind::Balance,
            Event::Deposit { .. } => TransactionKind::Deposit,
            Event::Withdraw { .. } => TransactionKind::Withdraw,
            Event::Transfer { .. } => TransactionKind::Transfer,
        }
    }

    /// Applies the event and returns the resulting account state.
    ///
    /// For a transfer this is the source account after the debit.
    pub fn process<S>(&self, accounts: &AccountService<S>) -> Result<Account, EventError>
    where
        S: AccountStore,
    {
        match self {
            Event::Create { name } => {
                let account = Account::open(name.as_str());
                accounts.create(&account)?;
                Ok(account)
            }
            Event::Balance { account_id } => read_existing(accounts, *account_id),
            Event::Deposit { account_id, amount } => {
                self.check_amount(*amount)?;
                let mut account = read_existing(accounts, *account_id)?;
                account.credit(*amount);
                accounts.update(&mut account)?;
                Ok(account)
            }
            Event::Withdraw { account_id, amount } => {
                self.check_amount(*amount)?;
                let mut account = read_existing(accounts, *account_id)?;
                ensure_covers(&account, *amount)?;
                account.debit(*amount);
                accounts.update(&mut account)?;
                Ok(account)
            }
            Event::Transfer {
                account_id,
                destination_id,
                amount,
            } => {
                self.check_amount(*amount)?;
                if account_id == destination_id {
                    return Err(EventError::SameAccountTransfer(*account_id));
                }
                transfer(accounts, *account_id, *destination_id, *amount)
            }
        }
    }

    fn check_amount(&self, amount: Decimal) -> Result<(), EventError> {
        if amount < Decimal::ZERO {
            return Err(EventError::NegativeAmount { kind: self.kind() });
        }
        Ok(())
    }
}

fn read_existing<S>(accounts: &AccountService<S>, id: AccountId) -> Result<Account, EventError>
where
    S: AccountStore,
{
    accounts.read(id)?.ok_or(EventError::NotFound(id))
}

fn ensure_covers(account: &Account, amount: Decimal) -> Result<(), EventError> {
    if account.can_cover(amount) {
        Ok(())
    } else {
        Err(EventError::InsufficientBalance {
            account_id: account.id,
            balance: account.balance,
            requested: amount,
        })
    }
}

fn transfer<S>(
    accounts: &AccountService<S>,
    source_id: AccountId,
    destination_id: AccountId,
    amount: Decimal,
) -> Result<Account, EventError>
where
    S: AccountStore,
{
    let mut source = read_existing(accounts, source_id)?;
    let mut destination = read_existing(accounts, destination_id)?;
    ensure_covers(&source, amount)?;

    source.debit(amount);
    destination.credit(amount);

    // destination untouched so far, nothing to undo
    accounts.update(&mut source)?;

    if let Err(cause) = accounts.update(&mut destination) {
        source.credit(amount);
        return match accounts.update(&mut source) {
            Ok(()) => {
                warn!(%source_id, %destination_id, %amount, %cause, "transfer rolled back");
                Err(cause.into())
            }
            Err(rollback_err) => {
                error!(
                    %source_id,
                    %destination_id,
                    %amount,
                    %cause,
                    %rollback_err,
                    "transfer left source debited"
                );
                Err(EventError::PartialTransfer {
                    source_id,
                    destination_id,
                    amount,
                    cause,
                })
            }
        };
    }

    Ok(source)
}
