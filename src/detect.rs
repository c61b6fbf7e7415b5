// Format Detector - does this file look like a Rabobank CSV export?
//
// Two gates, checked in order: the file name, then the header line.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use encoding_rs::WINDOWS_1252;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{ImportError, Result};

// ============================================================================
// STATEMENT FILE HANDLE
// ============================================================================

/// Bytes read when sniffing the header line.
const HEAD_BYTES: u64 = 8192;

/// A candidate statement on disk.
///
/// Rabobank writes single-byte Western text, not UTF-8, so every read goes
/// through the Windows-1252 decoder (the WHATWG meaning of `latin1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFile {
    path: PathBuf,
}

impl StatementFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StatementFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the file, or an empty string if it has none.
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }

    /// First line of the file, decoded, without its line terminator.
    pub fn head(&self) -> Result<String> {
        let mut bytes = Vec::new();
        File::open(&self.path)
            .and_then(|f| f.take(HEAD_BYTES).read_to_end(&mut bytes))
            .map_err(|source| self.io_error(source))?;

        let (text, _, _) = WINDOWS_1252.decode(&bytes);
        let line = text.lines().next().unwrap_or("");
        Ok(line.to_string())
    }

    /// Whole file, decoded.
    pub fn contents(&self) -> Result<String> {
        let bytes = std::fs::read(&self.path).map_err(|source| self.io_error(source))?;
        let (text, _, _) = WINDOWS_1252.decode(&bytes);
        Ok(text.into_owned())
    }

    fn io_error(&self, source: std::io::Error) -> ImportError {
        ImportError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

// ============================================================================
// FINGERPRINTS
// ============================================================================

/// Header of the original, Dutch-language export (prefix).
pub const LOCALIZED_HEADER: &str = concat!(
    r#""IBAN/BBAN","Munt","BIC","Volgnr","Datum","Rentedatum","Bedrag","Saldo na trn","#,
    r#""Tegenrekening IBAN/BBAN","Naam tegenpartij","Naam uiteindelijke partij","#,
);

/// Header of the internationalized export with the extra optional columns.
pub const INTERNATIONAL_HEADER: &str = concat!(
    r#""IBAN/BBAN","Ccy","BIC","Seq No","Date","Value Date","Amount","Bal After Bkng","#,
    r#""Counterpty IBAN/BBAN","Name Counterpty","Name Ultimate Pty","Name Initiating Pty","#,
    r#""Counterpty BIC","Code","Batch ID","Transaction Reference","Mandate Reference","#,
    r#""Collector ID","Payment Reference","Description-1","Description-2","Description-3","#,
    r#""Reasoncode","Instr Amt","Instr Ccy","Rate""#,
);

/// `CSV_A_<YYYYMMDD>_<6 digits>.csv`; group 1 is the statement date.
static FILE_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![Regex::new(r"^CSV_A_(\d{8})_\d{6}\.csv$").expect("valid regex")]
});

static HEADER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [LOCALIZED_HEADER, INTERNATIONAL_HEADER]
        .iter()
        .map(|header| Regex::new(&format!("^{}", regex::escape(header))).expect("valid regex"))
        .collect()
});

/// Does the base name follow the export naming scheme?
pub fn matches_file_name(name: &str) -> bool {
    FILE_NAME_PATTERNS.iter().any(|re| re.is_match(name))
}

/// The `YYYYMMDD` part of a matching base name.
pub fn statement_date_text(name: &str) -> Option<&str> {
    FILE_NAME_PATTERNS
        .iter()
        .find_map(|re| re.captures(name))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Does the header line start with one of the known fingerprints?
pub fn matches_header(line: &str) -> bool {
    HEADER_PATTERNS.iter().any(|re| re.is_match(line))
}

/// Name gate first, header gate second. Never errors: an unreadable file is
/// simply not ours.
pub fn identify(file: &StatementFile) -> bool {
    let name = file.name();
    if !matches_file_name(name) {
        debug!(file = name, "rejected: file name does not match");
        return false;
    }

    match file.head() {
        Ok(line) if matches_header(&line) => true,
        Ok(_) => {
            debug!(file = name, "rejected: unknown header");
            false
        }
        Err(e) => {
            warn!(file = name, error = %e, "could not read header");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_file_name() {
        assert!(matches_file_name("CSV_A_20200131_123456.csv"));
        assert!(!matches_file_name("csv_a_20200131_123456.csv"));
        assert!(!matches_file_name("CSV_A_2020013_123456.csv"));
        assert!(!matches_file_name("CSV_A_20200131_12345.csv"));
        assert!(!matches_file_name("CSV_A_20200131_123456.CSV"));
        assert!(!matches_file_name("CSV_A_20200131_123456.csv.bak"));
        assert!(!matches_file_name("bofa_march_2024.csv"));
    }

    #[test]
    fn test_statement_date_text() {
        assert_eq!(statement_date_text("CSV_A_20200131_123456.csv"), Some("20200131"));
        assert_eq!(statement_date_text("statement.csv"), None);
    }

    #[test]
    fn test_matches_localized_header_prefix() {
        let line = format!(
            "{}{}",
            LOCALIZED_HEADER,
            r#""Naam initiërende partij","BIC tegenpartij","Code""#
        );
        assert!(matches_header(&line));
    }

    #[test]
    fn test_matches_international_header() {
        assert!(matches_header(INTERNATIONAL_HEADER));
    }

    #[test]
    fn test_rejects_unknown_header() {
        assert!(!matches_header("Date,Description,Amount"));
        assert!(!matches_header(""));
        // Close is not enough.
        assert!(!matches_header(&LOCALIZED_HEADER.replace("IBAN/BBAN", "IBAN-BBAN")));
    }

    #[test]
    fn test_statement_file_name() {
        let file = StatementFile::new("/tmp/downloads/CSV_A_20200131_123456.csv");
        assert_eq!(file.name(), "CSV_A_20200131_123456.csv");
    }

    #[test]
    fn test_identify_checks_name_before_reading() {
        // Does not exist; the name gate must reject it without touching disk.
        let file = StatementFile::new("/nonexistent/dir/statement.csv");
        assert!(!identify(&file));
    }

    #[test]
    fn test_identify_unreadable_file_is_not_ours() {
        let file = StatementFile::new("/nonexistent/dir/CSV_A_20200131_123456.csv");
        assert!(!identify(&file));
    }
}
