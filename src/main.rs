use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use beancount_rabobank::{Entry, Importer, ImporterConfig, RabobankImporter, StatementFile};

/// Import Rabobank CSV statements as ledger entries.
#[derive(Parser, Debug)]
#[command(name = "rabobank-import", version, about, long_about = None)]
struct Cli {
    /// JSON file with `currency` and `account_root`
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Currency for every amount (overrides the config file)
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Account every posting targets (overrides the config file)
    #[arg(long, global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report which files are Rabobank statements
    Identify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print ledger entries for every recognised statement
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit JSON instead of beancount text
        #[arg(long)]
        json: bool,
    },
    /// Show where a statement would be filed
    File { file: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ImporterConfig> {
    let mut config = match &cli.config {
        Some(path) => ImporterConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ImporterConfig::default(),
    };
    if let Some(currency) = &cli.currency {
        config.currency = currency.clone();
    }
    if let Some(account) = &cli.account {
        config.account_root = account.clone();
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let importer = RabobankImporter::from_config(load_config(cli)?)?;
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Command::Identify { files } => {
            for path in files {
                let file = StatementFile::new(path);
                let verdict = if importer.identify(&file) { "yes" } else { "no" };
                writeln!(stdout, "{}\t{}", path.display(), verdict)?;
            }
        }
        Command::Extract { files, json } => {
            let mut all: Vec<Entry> = Vec::new();
            for path in files {
                let file = StatementFile::new(path);
                if !importer.identify(&file) {
                    eprintln!("skipping {}: not a {} file", path.display(), importer.name());
                    continue;
                }
                let entries = importer
                    .extract(&file, Some(all.as_slice()))
                    .with_context(|| format!("Failed to extract {}", path.display()))?;
                eprintln!("Extracted {} entries from {}", entries.len(), path.display());
                all.extend(entries);
            }

            if *json {
                serde_json::to_writer_pretty(&mut stdout, &all)?;
                writeln!(stdout)?;
            } else {
                for entry in &all {
                    writeln!(stdout, "{entry}\n")?;
                }
            }
        }
        Command::File { file: path } => {
            let file = StatementFile::new(path);
            let date = importer
                .file_date(&file)
                .with_context(|| format!("No statement date in {}", path.display()))?;
            writeln!(stdout, "name:    {}", importer.file_name(&file))?;
            writeln!(stdout, "account: {}", importer.file_account(&file))?;
            writeln!(stdout, "date:    {date}")?;
        }
    }

    Ok(())
}
