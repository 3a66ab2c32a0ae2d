use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

/// One input row. Accounts are referred to by name.
#[derive(Debug, Deserialize)]
pub struct Row {
    #[serde(rename = "type")]
    pub kind: String,
    pub account: String,
    pub destination: Option<String>,
    pub amount: Option<Decimal>,
}

/// Parses ledger rows in CSV format, yielding each row with its line number.
pub struct CsvRowParser<R> {
    iter: DeserializeRecordsIntoIter<R, Row>,
}

impl<R> CsvRowParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);
        // consume headers so positions point at data rows
        reader.headers()?;

        Ok(Self {
            iter: reader.into_deserialize(),
        })
    }
}

impl<R> Iterator for CsvRowParser<R>
where
    R: Read,
{
    type Item = (u64, Result<Row, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rows() {
        let input = "type, account, destination, amount\n\
                     create, alice,,\n\
                     transfer, alice, bob, 1.25\n\
                     deposit, alice,, lots\n";
        let rows: Vec<_> = CsvRowParser::new(input.as_bytes()).unwrap().collect();
        assert_eq!(rows.len(), 3);

        let (line, create) = &rows[0];
        let create = create.as_ref().unwrap();
        assert_eq!(*line, 2);
        assert_eq!(create.kind, "create");
        assert_eq!(create.account, "alice");
        assert!(create.destination.is_none());
        assert!(create.amount.is_none());

        let (line, transfer) = &rows[1];
        let transfer = transfer.as_ref().unwrap();
        assert_eq!(*line, 3);
        assert_eq!(transfer.destination.as_deref(), Some("bob"));
        assert_eq!(transfer.amount, Some(Decimal::new(125, 2)));

        assert_eq!(rows[2].0, 4);
        assert!(rows[2].1.is_err());
    }
}
