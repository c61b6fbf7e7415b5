// Field Resolver - header-name fallback across both Rabobank dialects
//
// The localized (Dutch) export and the internationalized export name the
// same columns differently. One synonym table covers both; the first
// header present with a non-empty value wins.

use std::collections::HashMap;

use crate::error::{ImportError, Result};

/// One CSV line keyed by its header names.
pub type RawRow = HashMap<String, String>;

// ============================================================================
// SYNONYM TABLE
// ============================================================================

/// Logical statement fields the importer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Counterparty,
    Amount,
    Description1,
    Description2,
    Description3,
    BalanceAfter,
}

/// Description columns, in the order they are concatenated.
pub const DESCRIPTION_PARTS: [Field; 3] =
    [Field::Description1, Field::Description2, Field::Description3];

impl Field {
    /// Accepted header names, highest priority first.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Field::Date => &["Datum", "Date"],
            Field::Counterparty => &["Naam tegenpartij", "Name Counterpty"],
            Field::Amount => &["Bedrag", "Amount"],
            Field::Description1 => &["Omschrijving-1", "Description-1"],
            Field::Description2 => &["Omschrijving-2", "Description-2"],
            Field::Description3 => &["Omschrijving-3", "Description-3"],
            Field::BalanceAfter => &["Saldo na trn", "Bal After Bkng"],
        }
    }

    /// Name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Counterparty => "counterparty",
            Field::Amount => "amount",
            Field::Description1 => "description-1",
            Field::Description2 => "description-2",
            Field::Description3 => "description-3",
            Field::BalanceAfter => "balance",
        }
    }
}

// ============================================================================
// LOOKUP
// ============================================================================

/// First value in `row` whose key appears in `synonyms` and is non-empty.
///
/// A missing key and an empty cell are both treated as absent; the caller
/// decides whether absence is fatal.
pub fn resolve<'r>(row: &'r RawRow, synonyms: &[&str]) -> Option<&'r str> {
    synonyms
        .iter()
        .filter_map(|key| row.get(*key))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

/// `resolve` against a field's synonym set.
pub fn resolve_field(row: &RawRow, field: Field) -> Option<&str> {
    resolve(row, field.synonyms())
}

/// Like `resolve_field`, but absence is a `MissingField` error for `row_index`.
pub fn require_field(row: &RawRow, field: Field, row_index: usize) -> Result<&str> {
    resolve_field(row, field).ok_or(ImportError::MissingField {
        field: field.label(),
        row: row_index,
    })
}

/// Description parts 1..3 glued together without a separator, then trimmed
/// once as a whole. Inner whitespace of each part is kept.
pub fn description(row: &RawRow) -> String {
    let joined: String = DESCRIPTION_PARTS
        .iter()
        .map(|part| resolve_field(row, *part).unwrap_or(""))
        .collect();
    joined.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_prefers_first_synonym() {
        let r = row(&[("Datum", "2020-01-01"), ("Date", "2021-02-02")]);
        assert_eq!(resolve_field(&r, Field::Date), Some("2020-01-01"));
    }

    #[test]
    fn test_resolve_falls_back_on_empty_value() {
        let r = row(&[("Bedrag", ""), ("Amount", "+1,00")]);
        assert_eq!(resolve_field(&r, Field::Amount), Some("+1,00"));
    }

    #[test]
    fn test_resolve_international_dialect() {
        let r = row(&[("Bal After Bkng", "+12,00")]);
        assert_eq!(resolve_field(&r, Field::BalanceAfter), Some("+12,00"));
    }

    #[test]
    fn test_resolve_absent() {
        let r = row(&[("Naam tegenpartij", "")]);
        assert_eq!(resolve_field(&r, Field::Counterparty), None);
        assert_eq!(resolve(&r, &[]), None);
    }

    #[test]
    fn test_require_field_reports_row() {
        let r = row(&[]);
        let err = require_field(&r, Field::Amount, 4).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingField { field: "amount", row: 4 }
        ));
    }

    #[test]
    fn test_description_concatenates_without_separator() {
        let r = row(&[
            ("Description-1", "A "),
            ("Description-2", "B"),
            ("Description-3", " C"),
        ]);
        assert_eq!(description(&r), "A B C");
    }

    #[test]
    fn test_description_trims_only_outer_whitespace() {
        let r = row(&[
            ("Omschrijving-1", "  Huur "),
            ("Omschrijving-3", " januari  "),
        ]);
        assert_eq!(description(&r), "Huur  januari");
    }

    #[test]
    fn test_description_empty_when_no_parts() {
        assert_eq!(description(&row(&[("Datum", "2020-01-01")])), "");
    }
}
