use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::domain::{
    cents_to_units, units_to_cents, Account, Customer, Population, Transaction, TransactionKind,
    BRANCH_CODE, DEFAULT_LIMIT_CENTS, TIMESTAMP_FORMAT,
};

/// Indentation used when writing the document, so it stays readable by hand.
const DOCUMENT_INDENT: &[u8] = b"    ";

/// Stored shape of a customer. The document key is the national id.
#[derive(Debug, Serialize, Deserialize)]
struct CustomerRecord {
    #[serde(rename = "nome")]
    name: String,
    #[serde(rename = "endereco")]
    address: String,
    #[serde(rename = "contas", default)]
    accounts: Vec<AccountRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccountRecord {
    #[serde(rename = "agencia", default = "default_branch")]
    branch: String,
    #[serde(rename = "numero_conta")]
    number: String,
    #[serde(rename = "saldo", default)]
    balance: f64,
    #[serde(rename = "limite", default = "default_limit")]
    limit: f64,
    #[serde(rename = "extrato", default)]
    statement: Vec<TransactionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionRecord {
    #[serde(rename = "tipo")]
    kind: KindRecord,
    #[serde(rename = "valor")]
    amount: f64,
    #[serde(rename = "data")]
    timestamp: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum KindRecord {
    #[serde(rename = "deposito")]
    Deposit,
    #[serde(rename = "saque")]
    Withdrawal,
}

fn default_branch() -> String {
    BRANCH_CODE.to_string()
}

fn default_limit() -> f64 {
    cents_to_units(DEFAULT_LIMIT_CENTS)
}

/// Reads and writes the whole customer population as a single JSON document.
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every customer from the document.
    ///
    /// A missing or unreadable-as-JSON document is not an error: it simply
    /// means there are no customers yet. Only I/O failures other than
    /// "not found" are reported.
    pub fn load(&self) -> Result<Population> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No ledger document at {}, starting empty", self.path.display());
                return Ok(Population::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        match parse_document(&contents) {
            Ok(population) => {
                debug!(
                    "Loaded {} customer(s) from {}",
                    population.len(),
                    self.path.display()
                );
                Ok(population)
            }
            Err(e) => {
                error!(
                    "Ignoring malformed ledger document {}: {:#}",
                    self.path.display(),
                    e
                );
                Ok(Population::new())
            }
        }
    }

    /// Replace the document with the given population.
    ///
    /// The new content is written next to the target and renamed over it,
    /// so readers never see a half-written file.
    pub fn save(&self, population: &Population) -> Result<()> {
        let contents = render_document(population)?;
        let staging = staging_path(&self.path);

        fs::write(&staging, contents)
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(
            "Saved {} customer(s) to {}",
            population.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("ledger"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn parse_document(contents: &str) -> Result<Population> {
    let records: IndexMap<String, CustomerRecord> =
        serde_json::from_str(contents).context("Invalid ledger JSON")?;

    Ok(records
        .into_iter()
        .map(|(national_id, record)| {
            let customer = record_to_customer(&national_id, record);
            (national_id, customer)
        })
        .collect())
}

fn render_document(population: &Population) -> Result<Vec<u8>> {
    let records: IndexMap<&str, CustomerRecord> = population
        .iter()
        .map(|(national_id, customer)| (national_id.as_str(), customer_to_record(customer)))
        .collect();

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(DOCUMENT_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records
        .serialize(&mut serializer)
        .context("Failed to serialize ledger")?;
    buffer.push(b'\n');
    Ok(buffer)
}

fn record_to_customer(national_id: &str, record: CustomerRecord) -> Customer {
    let accounts = record.accounts.into_iter().map(record_to_account).collect();
    Customer::new(national_id, record.name, record.address, accounts)
}

fn record_to_account(record: AccountRecord) -> Account {
    let transactions = record
        .statement
        .into_iter()
        .map(|entry| record_to_transaction(&record.number, entry))
        .collect();
    Account::restore(
        record.number,
        units_to_cents(record.balance),
        units_to_cents(record.limit),
        transactions,
    )
}

/// Dates are kept verbatim; one that does not follow [`TIMESTAMP_FORMAT`]
/// is only worth a warning.
fn record_to_transaction(account_number: &str, record: TransactionRecord) -> Transaction {
    if NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).is_err() {
        warn!(
            "Account {} has a transaction with an unexpected date '{}'",
            account_number, record.timestamp
        );
    }
    let kind = match record.kind {
        KindRecord::Deposit => TransactionKind::Deposit,
        KindRecord::Withdrawal => TransactionKind::Withdrawal,
    };
    Transaction::at(kind, units_to_cents(record.amount), record.timestamp)
}

fn customer_to_record(customer: &Customer) -> CustomerRecord {
    CustomerRecord {
        name: customer.full_name.clone(),
        address: customer.address.clone(),
        accounts: customer.accounts().iter().map(account_to_record).collect(),
    }
}

fn account_to_record(account: &Account) -> AccountRecord {
    AccountRecord {
        branch: account.branch_code().to_string(),
        number: account.number().to_string(),
        balance: cents_to_units(account.balance()),
        limit: cents_to_units(account.limit()),
        statement: account.history().iter().map(transaction_to_record).collect(),
    }
}

fn transaction_to_record(transaction: &Transaction) -> TransactionRecord {
    TransactionRecord {
        kind: match transaction.kind() {
            TransactionKind::Deposit => KindRecord::Deposit,
            TransactionKind::Withdrawal => KindRecord::Withdrawal,
        },
        amount: cents_to_units(transaction.amount_cents()),
        timestamp: transaction.timestamp().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const SAMPLE: &str = r#"{
    "11122233344": {
        "nome": "Maria Silva",
        "endereco": "Rua A, 10",
        "contas": [
            {
                "agencia": "0001",
                "numero_conta": "100001",
                "saldo": -600.0,
                "limite": 500.0,
                "extrato": [
                    {"tipo": "deposito", "valor": 200.0, "data": "2024-03-09 10:15:00"},
                    {"tipo": "saque", "valor": 800.0, "data": "2024-03-09 10:16:30"}
                ]
            }
        ]
    }
}"#;

    fn repo_in(dir: &TempDir) -> Repository {
        Repository::new(dir.path().join("ledger.json"))
    }

    #[test]
    fn test_parse_existing_document() {
        let population = parse_document(SAMPLE).unwrap();
        let customer = &population["11122233344"];
        assert_eq!(customer.full_name, "Maria Silva");

        let account = customer.find_account("100001").unwrap();
        assert_eq!(account.balance(), -60000);
        assert_eq!(account.limit(), 50000);
        assert_eq!(account.available(), -10000);
        assert_eq!(account.history().len(), 2);
        assert_eq!(account.history()[1].kind(), TransactionKind::Withdrawal);
        assert_eq!(
            account.history()[1].to_string(),
            "2024-03-09 10:16:30 | Withdrawal: R$ 800.00"
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let doc = r#"{"1": {"nome": "A", "endereco": "B", "contas": [{"numero_conta": "100002"}]}}"#;
        let population = parse_document(doc).unwrap();
        let account = population["1"].find_account("100002").unwrap();
        assert_eq!(account.balance(), 0);
        assert_eq!(account.limit(), DEFAULT_LIMIT_CENTS);
        assert!(account.history().is_empty());
    }

    #[test]
    fn test_unknown_transaction_kind_is_rejected() {
        let doc = r#"{"1": {"nome": "A", "endereco": "B", "contas": [{"numero_conta": "1",
            "extrato": [{"tipo": "pix", "valor": 1.0, "data": "2024-01-01 00:00:00"}]}]}}"#;
        assert!(parse_document(doc).is_err());
    }

    #[test]
    fn test_unexpected_date_is_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(
            repo.path(),
            r#"{
                "1": {"nome": "A", "endereco": "B", "contas": [{"numero_conta": "100001", "saldo": 5.0,
                    "extrato": [{"tipo": "deposito", "valor": 5.0, "data": "09/03/2024"}]}]},
                "2": {"nome": "C", "endereco": "D", "contas": [{"numero_conta": "100002"}]}
            }"#,
        )
        .unwrap();

        let population = repo.load().unwrap();
        assert_eq!(population.len(), 2);
        let entry = &population["1"].find_account("100001").unwrap().history()[0];
        assert_eq!(entry.timestamp(), "09/03/2024");
        assert_eq!(entry.to_string(), "09/03/2024 | Deposit: R$ 5.00");

        repo.save(&population).unwrap();
        let written = fs::read_to_string(repo.path()).unwrap();
        assert!(written.contains("\"data\": \"09/03/2024\""));
    }

    #[test]
    fn test_document_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(
            repo.path(),
            r#"{"9": {"nome": "Z", "endereco": "-"}, "1": {"nome": "A", "endereco": "-"},
                "5": {"nome": "M", "endereco": "-"}}"#,
        )
        .unwrap();

        let population = repo.load().unwrap();
        let ids: Vec<&str> = population.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["9", "1", "5"]);

        repo.save(&population).unwrap();
        let written = fs::read_to_string(repo.path()).unwrap();
        let positions: Vec<usize> = ["\"9\"", "\"1\"", "\"5\""]
            .iter()
            .map(|key| written.find(key).unwrap())
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(repo_in(&dir).load().unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(repo.path(), "{ not json").unwrap();
        assert!(repo.load().unwrap().is_empty());

        fs::write(repo.path(), r#"{"1": {"nome": "A"}}"#).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_writes_readable_document() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let population = parse_document(SAMPLE).unwrap();

        repo.save(&population).unwrap();

        let written = fs::read_to_string(repo.path()).unwrap();
        assert!(written.starts_with("{\n    \"11122233344\": {\n        \"nome\""));
        assert!(written.contains("\"tipo\": \"saque\""));
        assert!(written.contains("\"saldo\": -600.0"));
        assert!(!staging_path(repo.path()).exists());

        let reloaded = repo.load().unwrap();
        assert_eq!(reloaded, population);
    }
}
