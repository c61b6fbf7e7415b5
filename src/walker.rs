// Statement Walker - turns parsed rows into transactions plus balance assertions
//
// Rows must be fed in file order. A balance assertion is emitted whenever
// the target account changes, and once more after the last row, always from
// the *previous* row's state: its account, its balance-after, its date + 1.

use chrono::NaiveDate;
use tracing::trace;

use crate::entries::{balance_entry, transaction_entry, Entry, Metadata};
use crate::error::{ImportError, Result};
use crate::values::Amount;

/// One statement row after field resolution and value parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub meta: Metadata,
    pub date: NaiveDate,
    pub payee: Option<String>,
    pub narration: String,
    pub account: String,
    pub amount: Amount,
    pub balance: Amount,
}

/// What the walker remembers about the last processed row.
#[derive(Debug, Clone)]
struct PriorRow {
    meta: Metadata,
    account: String,
    date: NaiveDate,
    balance: Amount,
}

impl PriorRow {
    fn assert_balance(&self, meta: Metadata) -> Result<Entry> {
        let date = self
            .date
            .succ_opt()
            .ok_or(ImportError::DateOutOfRange(self.date))?;
        Ok(balance_entry(meta, date, &self.account, self.balance.clone()))
    }
}

/// Per-extraction accumulator. `prior == None` is the no-prior-row state;
/// once a row has been pushed it never goes back.
#[derive(Debug, Default)]
pub struct StatementWalker {
    prior: Option<PriorRow>,
    entries: Vec<Entry>,
}

impl StatementWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one row: maybe a balance for the previous account, then the
    /// row's own transaction.
    pub fn push(&mut self, row: ParsedRow) -> Result<()> {
        if let Some(prior) = &self.prior {
            if prior.account != row.account {
                trace!(from = %prior.account, to = %row.account, "account changed");
                let balance = prior.assert_balance(row.meta.clone())?;
                self.entries.push(balance);
            }
        }

        self.entries.push(transaction_entry(
            row.meta.clone(),
            row.date,
            row.payee,
            row.narration,
            &row.account,
            row.amount,
        ));

        self.prior = Some(PriorRow {
            meta: row.meta,
            account: row.account,
            date: row.date,
            balance: row.balance,
        });
        Ok(())
    }

    /// Close the statement with a balance for the last row. An empty
    /// statement has nothing to assert and yields nothing.
    pub fn finish(mut self) -> Result<Vec<Entry>> {
        if let Some(prior) = &self.prior {
            let balance = prior.assert_balance(prior.meta.clone())?;
            self.entries.push(balance);
        }
        Ok(self.entries)
    }
}

/// Drive a fresh walker over `rows`, stopping at the first error.
pub fn walk<I>(rows: I) -> Result<Vec<Entry>>
where
    I: IntoIterator<Item = Result<ParsedRow>>,
{
    let mut walker = StatementWalker::new();
    for row in rows {
        walker.push(row?)?;
    }
    walker.finish()
}
