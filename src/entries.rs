// Ledger entries and the Entry Builder
//
// Entries are plain immutable records. `Display` renders them as beancount
// directives for the command-line front end; the host normally does its own
// rendering.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::values::Amount;

/// Flag put on every imported transaction.
pub const FLAG_OKAY: char = '*';

// ============================================================================
// CORE TYPES
// ============================================================================

/// Provenance of an entry: the statement file and the zero-based row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub filename: String,
    pub lineno: usize,
}

impl Metadata {
    pub fn new(filename: impl Into<String>, lineno: usize) -> Self {
        Metadata {
            filename: filename.into(),
            lineno,
        }
    }
}

/// One leg of a transaction. Imported transactions carry units only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account: String,
    pub units: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEntry {
    pub meta: Metadata,
    pub date: NaiveDate,
    pub flag: char,
    pub payee: Option<String>,
    pub narration: String,
    pub tags: BTreeSet<String>,
    pub links: BTreeSet<String>,
    pub postings: Vec<Posting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub meta: Metadata,
    pub date: NaiveDate,
    pub account: String,
    pub amount: Amount,
}

/// Output of an extraction, in statement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    Transaction(TransactionEntry),
    Balance(BalanceEntry),
}

impl Entry {
    pub fn date(&self) -> NaiveDate {
        match self {
            Entry::Transaction(t) => t.date,
            Entry::Balance(b) => b.date,
        }
    }

    pub fn meta(&self) -> &Metadata {
        match self {
            Entry::Transaction(t) => &t.meta,
            Entry::Balance(b) => &b.meta,
        }
    }

    pub fn as_transaction(&self) -> Option<&TransactionEntry> {
        match self {
            Entry::Transaction(t) => Some(t),
            Entry::Balance(_) => None,
        }
    }

    pub fn as_balance(&self) -> Option<&BalanceEntry> {
        match self {
            Entry::Balance(b) => Some(b),
            Entry::Transaction(_) => None,
        }
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Single-posting, amount-only transaction.
pub fn transaction_entry(
    meta: Metadata,
    date: NaiveDate,
    payee: Option<String>,
    narration: String,
    account: &str,
    units: Amount,
) -> Entry {
    Entry::Transaction(TransactionEntry {
        meta,
        date,
        flag: FLAG_OKAY,
        payee,
        narration,
        tags: BTreeSet::new(),
        links: BTreeSet::new(),
        postings: vec![Posting {
            account: account.to_string(),
            units,
        }],
    })
}

/// Balance assertion as given; callers pick the assertion date.
pub fn balance_entry(meta: Metadata, date: NaiveDate, account: &str, amount: Amount) -> Entry {
    Entry::Balance(BalanceEntry {
        meta,
        date,
        account: account.to_string(),
        amount,
    })
}

// ============================================================================
// BEANCOUNT RENDERING
// ============================================================================

struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.account, self.units)
    }
}

impl fmt::Display for TransactionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.flag)?;
        if let Some(payee) = &self.payee {
            write!(f, " {}", Quoted(payee))?;
        }
        write!(f, " {}", Quoted(&self.narration))?;
        for tag in &self.tags {
            write!(f, " #{tag}")?;
        }
        for link in &self.links {
            write!(f, " ^{link}")?;
        }
        for posting in &self.postings {
            write!(f, "\n  {posting}")?;
        }
        Ok(())
    }
}

impl fmt::Display for BalanceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} balance {}  {}", self.date, self.account, self.amount)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Transaction(t) => fmt::Display::fmt(t, f),
            Entry::Balance(b) => fmt::Display::fmt(b, f),
        }
    }
}
