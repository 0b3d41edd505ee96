use std::path::PathBuf;

use log::{info, warn};

use crate::domain::{format_cents, next_account_number, Account, Cents, Customer, Population};
use crate::storage::Repository;

use super::reporting::{truncate_name, AccountListing, Statement};
use super::AppError;

/// Application service owning the customer population and its document.
/// This is the primary interface for any client (the interactive shell, tests).
///
/// Every successful mutation rewrites the whole document before returning.
pub struct LedgerService {
    repo: Repository,
    customers: Population,
}

impl LedgerService {
    /// Create a service over an already loaded population.
    pub fn new(repo: Repository, customers: Population) -> Self {
        Self { repo, customers }
    }

    /// Open the ledger document at `path`, starting empty if it does not
    /// exist yet or cannot be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let repo = Repository::new(path);
        let customers = repo.load()?;
        Ok(Self::new(repo, customers))
    }

    /// Write the full population back to the document.
    pub fn save(&self) -> Result<(), AppError> {
        Ok(self.repo.save(&self.customers)?)
    }

    /// Persist the current population. If the document cannot be written,
    /// `previous` becomes the in-memory state again so memory never holds a
    /// change the document lacks.
    fn commit(&mut self, previous: Population) -> Result<(), AppError> {
        if let Err(e) = self.save() {
            warn!("Save failed, discarding the unsaved change: {}", e);
            self.customers = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn customers(&self) -> &Population {
        &self.customers
    }

    pub fn customer(&self, national_id: &str) -> Result<&Customer, AppError> {
        self.customers
            .get(national_id)
            .ok_or_else(|| AppError::CustomerNotFound(national_id.to_string()))
    }

    pub fn account(&self, national_id: &str, account_number: &str) -> Result<&Account, AppError> {
        self.customer(national_id)?
            .find_account(account_number)
            .ok_or_else(|| AppError::AccountNotFound(account_number.to_string()))
    }

    fn account_mut(
        &mut self,
        national_id: &str,
        account_number: &str,
    ) -> Result<&mut Account, AppError> {
        self.customers
            .get_mut(national_id)
            .ok_or_else(|| AppError::CustomerNotFound(national_id.to_string()))?
            .find_account_mut(account_number)
            .ok_or_else(|| AppError::AccountNotFound(account_number.to_string()))
    }

    // ========================
    // Customer and account operations
    // ========================

    /// Register a new customer together with their first account.
    pub fn create_customer(
        &mut self,
        national_id: &str,
        full_name: &str,
        address: &str,
        limit: Cents,
    ) -> Result<Account, AppError> {
        if self.customers.contains_key(national_id) {
            return Err(AppError::CustomerAlreadyExists(national_id.to_string()));
        }
        validate_limit(limit)?;

        let previous = self.customers.clone();
        let account = Account::new(self.allocate_account_number(), limit);
        let customer = Customer::new(national_id, full_name, address, vec![account.clone()]);
        self.customers.insert(national_id.to_string(), customer);
        self.commit(previous)?;

        info!(
            "Created customer {} with account {}",
            national_id,
            account.number()
        );
        Ok(account)
    }

    /// Open another account for an existing customer.
    pub fn add_account(&mut self, national_id: &str, limit: Cents) -> Result<Account, AppError> {
        if !self.customers.contains_key(national_id) {
            return Err(AppError::CustomerNotFound(national_id.to_string()));
        }
        validate_limit(limit)?;

        let previous = self.customers.clone();
        let account = Account::new(self.allocate_account_number(), limit);
        if let Some(customer) = self.customers.get_mut(national_id) {
            customer.push_account(account.clone());
        }
        self.commit(previous)?;

        info!("Added account {} for customer {}", account.number(), national_id);
        Ok(account)
    }

    /// Next free account number: one above the highest in use, starting at 100001.
    pub fn allocate_account_number(&self) -> String {
        next_account_number(&self.customers)
    }

    // ========================
    // Balance operations
    // ========================

    pub fn deposit(
        &mut self,
        national_id: &str,
        account_number: &str,
        amount: Cents,
    ) -> Result<Account, AppError> {
        let previous = self.customers.clone();
        let account = self.account_mut(national_id, account_number)?;
        account
            .deposit(amount)
            .map_err(|e| AppError::from_account(account_number, e))?;
        let updated = account.clone();
        self.commit(previous)?;

        info!(
            "Deposited {} into account {}",
            format_cents(amount),
            account_number
        );
        Ok(updated)
    }

    pub fn withdraw(
        &mut self,
        national_id: &str,
        account_number: &str,
        amount: Cents,
    ) -> Result<Account, AppError> {
        let previous = self.customers.clone();
        let account = self.account_mut(national_id, account_number)?;
        account
            .withdraw(amount)
            .map_err(|e| AppError::from_account(account_number, e))?;
        let updated = account.clone();
        self.commit(previous)?;

        info!(
            "Withdrew {} from account {}",
            format_cents(amount),
            account_number
        );
        Ok(updated)
    }

    // ========================
    // Reports
    // ========================

    pub fn statement(
        &self,
        national_id: &str,
        account_number: &str,
    ) -> Result<Statement, AppError> {
        let account = self.account(national_id, account_number)?;
        Ok(Statement {
            account_number: account.number().to_string(),
            transactions: account.history().to_vec(),
            balance: account.balance(),
            available: account.available(),
        })
    }

    /// One row per account, customers in the order they were registered,
    /// accounts in the order they were opened.
    pub fn list_accounts(&self) -> Vec<AccountListing> {
        self.customers
            .values()
            .flat_map(|customer| {
                customer.accounts().iter().map(move |account| AccountListing {
                    account_number: account.number().to_string(),
                    owner_name: truncate_name(&customer.full_name),
                    national_id: customer.national_id_formatted(),
                    available: account.available(),
                })
            })
            .collect()
    }
}

fn validate_limit(limit: Cents) -> Result<(), AppError> {
    if limit < 0 {
        return Err(AppError::InvalidAmount(format!(
            "limit must not be negative, got {}",
            format_cents(limit)
        )));
    }
    Ok(())
}
