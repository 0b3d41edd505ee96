// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use banca::application::LedgerService;
use tempfile::TempDir;

/// Helper to create a test service backed by a document in a temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(document_path(&temp_dir))?;
    Ok((service, temp_dir))
}

/// Where `test_service` keeps its document
pub fn document_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("ledger.json")
}

/// Reopen the document from disk, as a fresh process would
pub fn reopen(temp_dir: &TempDir) -> Result<LedgerService> {
    Ok(LedgerService::open(document_path(temp_dir))?)
}

/// Test fixture: the customers used across scenarios
pub struct StandardCustomers;

impl StandardCustomers {
    pub const MARIA: &'static str = "11122233344";
    pub const JOAO: &'static str = "55566677788";

    /// Maria gets account 100001 (limit 500.00), João gets 100002 (limit 0).
    pub fn create_basic(service: &mut LedgerService) -> Result<()> {
        service.create_customer(Self::MARIA, "Maria Silva", "Rua A, 10", 50000)?;
        service.create_customer(Self::JOAO, "João Souza", "Av. B, 200", 0)?;
        Ok(())
    }
}
