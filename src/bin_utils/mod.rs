//! CSV front-end bootstrapping [`tiny_ledger`] within the binary. Kept in the
//! library so the integration test can drive it.

use std::{
    collections::HashMap,
    io::{Read, Write},
};

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use crate::{
    account::AccountId,
    config::LedgerConfig,
    dispatcher::{DispatchError, TransactionDispatcher},
    event::{Event, EventError},
    service::AccountService,
    store::in_memory::{InMemoryAccountStore, InMemoryTransactionStore},
    transaction::{Transaction, TransactionKind},
};
use csv_parser::{CsvRowParser, Row};
use csv_printer::print_accounts;

pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum RowError {
    #[error("Malformed row: {0}")]
    Parse(#[from] csv::Error),
    #[error("Account name can't be empty")]
    EmptyName,
    #[error("Unknown account `{0}`")]
    UnknownAccount(String),
    #[error("Amount is required for {kind}")]
    AmountRequired { kind: TransactionKind },
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

type Dispatcher = TransactionDispatcher<InMemoryAccountStore, InMemoryTransactionStore>;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub config: LedgerConfig,
    pub error_printer: Box<dyn FnMut(u64, RowError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvRowParser::new(self.input)?;

        let dispatcher = TransactionDispatcher::new(
            AccountService::new(InMemoryAccountStore::new()),
            InMemoryTransactionStore::new(),
            self.config,
        );
        let mut names = HashMap::new();

        for (line, row) in parser {
            let result = row
                .map_err(RowError::from)
                .and_then(|row| process_row(&dispatcher, &mut names, row));
            if let Err(err) = result {
                (self.error_printer)(line, err);
            }
        }

        let mut accounts = dispatcher.accounts().store().accounts()?;
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        print_accounts(self.output, accounts)
    }
}

fn process_row(
    dispatcher: &Dispatcher,
    names: &mut HashMap<String, AccountId>,
    row: Row,
) -> Result<(), RowError> {
    // unknown types are rejected before any name lookup
    let kind = row
        .kind
        .parse::<TransactionKind>()
        .map_err(|err| DispatchError::InvalidTransactionType(err.0))?;

    match kind {
        TransactionKind::Create => {
            if row.account.is_empty() {
                return Err(RowError::EmptyName);
            }
            let acc = dispatcher.run(&Event::create(row.account))?;
            names.insert(acc.name, acc.id);
            return Ok(());
        }
        TransactionKind::Balance => {
            let acc = dispatcher.run(&Event::balance(resolve(names, &row.account)?))?;
            info!(account = %acc.name, balance = %acc.balance, "balance");
            return Ok(());
        }
        TransactionKind::Deposit | TransactionKind::Withdraw | TransactionKind::Transfer => {}
    }

    let account_id = resolve(names, &row.account)?;
    // only transfers use the destination column, the dispatcher clears it otherwise
    let destination_id = match kind {
        TransactionKind::Transfer => row
            .destination
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| resolve(names, name))
            .transpose()?,
        _ => None,
    };
    let amount = row.amount.ok_or(RowError::AmountRequired { kind })?;

    let mut transaction = Transaction::new(row.kind, account_id, destination_id, amount);
    dispatcher.submit(&mut transaction)?;
    Ok(())
}

fn resolve(names: &HashMap<String, AccountId>, name: &str) -> Result<AccountId, RowError> {
    names
        .get(name)
        .copied()
        .ok_or_else(|| RowError::UnknownAccount(name.to_string()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn dispatcher() -> Dispatcher {
        TransactionDispatcher::new(
            AccountService::new(InMemoryAccountStore::new()),
            InMemoryTransactionStore::new(),
            LedgerConfig::default(),
        )
    }

    fn row(kind: &str, account: &str, destination: Option<&str>, amount: Option<u32>) -> Row {
        Row {
            kind: kind.to_string(),
            account: account.to_string(),
            destination: destination.map(str::to_string),
            amount: amount.map(Decimal::from),
        }
    }

    #[test]
    fn create_requires_a_name() {
        let dispatcher = dispatcher();
        let mut names = HashMap::new();

        let err = process_row(&dispatcher, &mut names, row("create", "", None, None)).unwrap_err();
        assert!(matches!(err, RowError::EmptyName));
        assert!(names.is_empty());
        assert!(dispatcher.accounts().store().accounts().unwrap().is_empty());
    }

    #[test]
    fn destination_column_only_matters_for_transfers() {
        let dispatcher = dispatcher();
        let mut names = HashMap::new();
        process_row(&dispatcher, &mut names, row("create", "alice", None, None)).unwrap();

        process_row(&dispatcher, &mut names, row("deposit", "alice", Some("zed"), Some(5))).unwrap();
        process_row(&dispatcher, &mut names, row("withdraw", "alice", Some("zed"), Some(2))).unwrap();
        let err = process_row(&dispatcher, &mut names, row("transfer", "alice", Some("zed"), Some(1)))
            .unwrap_err();
        assert!(matches!(err, RowError::UnknownAccount(name) if name == "zed"));

        let alice = dispatcher.run(&Event::balance(names["alice"])).unwrap();
        assert_eq!(alice.balance, Decimal::from(3));
        let recorded = dispatcher.transactions().transactions().unwrap();
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|tx| tx.destination_id.is_none()));
    }

    #[test]
    fn unknown_type_is_rejected_before_name_lookup() {
        let dispatcher = dispatcher();
        let mut names = HashMap::new();

        let err = process_row(&dispatcher, &mut names, row("refund", "carol", None, Some(1))).unwrap_err();
        assert!(matches!(
            err,
            RowError::Dispatch(DispatchError::InvalidTransactionType(kind)) if kind == "refund"
        ));
    }
}
