// Rabobank CSV importer - Core Library
// Exposes the importer pipeline for the CLI, host ledger tools, and tests

pub mod config;
pub mod detect;    // Format Detector + statement file handle
pub mod entries;   // Ledger entries + Entry Builder
pub mod error;
pub mod fields;    // Field Resolver - header synonyms for both dialects
pub mod importer;  // Host collaborator trait + Rabobank implementation
pub mod values;    // Date and amount parsers
pub mod walker;    // Statement Walker - balance assertion placement

// Re-export commonly used types
pub use config::ImporterConfig;
pub use detect::{identify, StatementFile, INTERNATIONAL_HEADER, LOCALIZED_HEADER};
pub use entries::{
    balance_entry, transaction_entry, BalanceEntry, Entry, Metadata, Posting, TransactionEntry,
};
pub use error::{ImportError, Result};
pub use fields::{resolve, Field, RawRow};
pub use importer::{Importer, RabobankImporter};
pub use values::{parse_amount, parse_date, parse_signed_amount, Amount, DateLayout};
pub use walker::{walk, ParsedRow, StatementWalker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
