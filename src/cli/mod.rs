use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use crate::application::LedgerService;

mod shell;

pub use shell::*;

/// Banca - single-user banking ledger
#[derive(Parser)]
#[command(name = "banca")]
#[command(about = "Manage customers, accounts, deposits and withdrawals from an interactive menu")]
#[command(version)]
pub struct Cli {
    /// Ledger document path
    #[arg(short, long, default_value = "data_contas.json")]
    pub data: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Default log filter, used unless RUST_LOG is set.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    pub fn run(self) -> Result<()> {
        debug!("Opening ledger document {}", self.data.display());
        let service = LedgerService::open(&self.data)
            .with_context(|| format!("Failed to open ledger {}", self.data.display()))?;

        let stdin = io::stdin();
        let mut shell = Shell::new(service, stdin.lock(), io::stdout());
        shell.run()
    }
}
