// 🏦 Importer - the collaborator contract the host ledger tool drives
//
// The host discovers files, asks `identify`, then `extract`s entries and
// files the statement away using `file_name` / `file_account` / `file_date`.
// Deduplication and rendering stay on the host side.

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::config::ImporterConfig;
use crate::detect::{self, StatementFile};
use crate::entries::{Entry, Metadata};
use crate::error::{ImportError, Result};
use crate::fields::{self, Field, RawRow};
use crate::values::{parse_date, parse_signed_amount, DateLayout};
use crate::walker::{walk, ParsedRow};

// ============================================================================
// COLLABORATOR TRAIT
// ============================================================================

/// Importer - what a host needs from one bank-format plugin.
///
/// Adding a bank means implementing this trait; nothing else changes.
pub trait Importer: Send + Sync {
    /// Human-readable label.
    fn name(&self) -> &str;

    /// Is this file ours? Never fails; unreadable files are simply not ours.
    fn identify(&self, file: &StatementFile) -> bool;

    /// Transform the whole statement into ledger entries, in file order.
    ///
    /// `existing_entries` is what the host already knows about; importers
    /// may ignore it.
    fn extract(&self, file: &StatementFile, existing_entries: Option<&[Entry]>)
        -> Result<Vec<Entry>>;

    /// Account the statement belongs to.
    fn file_account(&self, file: &StatementFile) -> &str;

    /// Statement date used when filing the document.
    fn file_date(&self, file: &StatementFile) -> Result<NaiveDate>;

    /// Name the document is filed under.
    fn file_name(&self, file: &StatementFile) -> String;
}

// ============================================================================
// RABOBANK
// ============================================================================

/// Rabobank CSV export, both the Dutch and the internationalized dialect.
#[derive(Debug, Clone)]
pub struct RabobankImporter {
    config: ImporterConfig,
}

impl RabobankImporter {
    pub fn new(currency: impl Into<String>, account_root: impl Into<String>) -> Result<Self> {
        Self::from_config(ImporterConfig::new(currency, account_root))
    }

    pub fn from_config(config: ImporterConfig) -> Result<Self> {
        config.validate()?;
        Ok(RabobankImporter { config })
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub fn account_root(&self) -> &str {
        &self.config.account_root
    }

    /// Resolve and parse one raw row. All rows post to the root account.
    fn parse_row(&self, filename: &str, index: usize, row: &RawRow) -> Result<ParsedRow> {
        let meta = Metadata::new(filename, index);

        let date_text = fields::require_field(row, Field::Date, index)?;
        let date = parse_date(date_text, DateLayout::Hyphenated).map_err(|e| e.at_row(index))?;

        let payee = fields::resolve_field(row, Field::Counterparty).map(str::to_string);

        let amount_text = fields::require_field(row, Field::Amount, index)?;
        let amount = parse_signed_amount(amount_text, self.currency()).map_err(|e| e.at_row(index))?;

        let narration = fields::description(row);
        let account = self.account_root().to_string();

        let balance_text = fields::require_field(row, Field::BalanceAfter, index)?;
        let balance =
            parse_signed_amount(balance_text, self.currency()).map_err(|e| e.at_row(index))?;

        trace!(row = index, %date, amount = %amount, "parsed row");

        Ok(ParsedRow {
            meta,
            date,
            payee,
            narration,
            account,
            amount,
            balance,
        })
    }
}

impl Importer for RabobankImporter {
    fn name(&self) -> &str {
        "Rabobank CSV"
    }

    fn identify(&self, file: &StatementFile) -> bool {
        detect::identify(file)
    }

    fn extract(
        &self,
        file: &StatementFile,
        _existing_entries: Option<&[Entry]>,
    ) -> Result<Vec<Entry>> {
        // Decoded up front; the file is closed before any row is parsed.
        let contents = file.contents()?;
        let filename = file.path().display().to_string();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(contents.as_bytes());

        let rows = reader
            .deserialize::<RawRow>()
            .enumerate()
            .map(|(index, record)| {
                let row = record.map_err(|e| ImportError::Csv(e).at_row(index))?;
                self.parse_row(&filename, index, &row)
            });

        let entries = walk(rows)?;
        debug!(file = %filename, entries = entries.len(), "extracted statement");
        Ok(entries)
    }

    fn file_account(&self, _file: &StatementFile) -> &str {
        self.account_root()
    }

    fn file_date(&self, file: &StatementFile) -> Result<NaiveDate> {
        let name = file.name();
        let text = detect::statement_date_text(name)
            .ok_or_else(|| ImportError::FileNameMismatch(name.to_string()))?;
        parse_date(text, DateLayout::Compact)
    }

    fn file_name(&self, file: &StatementFile) -> String {
        format!("rabobank.{}", file.name())
    }
}
