use std::io::Write;

use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::{Account, AccountId};

/// Output columns. The version stamp stays internal.
#[derive(Debug, Serialize)]
struct AccountRow<'a> {
    id: AccountId,
    name: &'a str,
    balance: Decimal,
}

impl<'a> From<&'a Account> for AccountRow<'a> {
    fn from(acc: &'a Account) -> Self {
        Self {
            id: acc.id,
            name: &acc.name,
            balance: acc.balance,
        }
    }
}

/// Writes `id,name,balance` rows in the given order.
pub fn print_accounts<W>(
    output: &mut W,
    accounts: impl IntoIterator<Item = Account>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in accounts {
        writer
            .serialize(AccountRow::from(&acc))
            .with_context(|| format!("Failed to write account {} to CSV", acc.id))?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}
