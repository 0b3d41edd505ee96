use std::fmt;

use super::{format_cents, Cents, Transaction, TransactionKind};

/// Every account belongs to the same branch.
pub const BRANCH_CODE: &str = "0001";

/// Overdraft allowance assumed for stored accounts that do not carry one.
pub const DEFAULT_LIMIT_CENTS: Cents = 50000;

/// A checking account with a built-in overdraft.
///
/// The balance may go negative, but never below `-limit`. All changes go
/// through [`Account::deposit`] and [`Account::withdraw`], each of which
/// appends one [`Transaction`] on success and leaves the account untouched
/// on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    number: String,
    balance: Cents,
    limit: Cents,
    transactions: Vec<Transaction>,
}

impl Account {
    /// Open an empty account.
    pub fn new(number: impl Into<String>, limit: Cents) -> Self {
        Self::restore(number, 0, limit, Vec::new())
    }

    /// Rebuild an account from previously persisted state.
    pub fn restore(
        number: impl Into<String>,
        balance: Cents,
        limit: Cents,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            number: number.into(),
            balance,
            limit,
            transactions,
        }
    }

    pub fn branch_code(&self) -> &'static str {
        BRANCH_CODE
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn balance(&self) -> Cents {
        self.balance
    }

    pub fn limit(&self) -> Cents {
        self.limit
    }

    /// Balance plus overdraft limit: what can actually be withdrawn.
    /// Saturates at the bounds of [`Cents`].
    pub fn available(&self) -> Cents {
        self.balance.saturating_add(self.limit)
    }

    /// Statement entries, oldest first.
    pub fn history(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn deposit(&mut self, amount: Cents) -> Result<(), AccountError> {
        if amount <= 0 {
            return Err(AccountError::NonPositiveAmount(amount));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(AccountError::AmountTooLarge(amount))?;
        self.transactions
            .push(Transaction::new(TransactionKind::Deposit, amount));
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Cents) -> Result<(), AccountError> {
        if amount <= 0 {
            return Err(AccountError::NonPositiveAmount(amount));
        }
        let available = self.available();
        if available < amount {
            return Err(AccountError::InsufficientFunds {
                available,
                requested: amount,
            });
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(AccountError::AmountTooLarge(amount))?;
        self.transactions
            .push(Transaction::new(TransactionKind::Withdrawal, amount));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    NonPositiveAmount(Cents),
    AmountTooLarge(Cents),
    InsufficientFunds { available: Cents, requested: Cents },
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::NonPositiveAmount(amount) => {
                write!(f, "amount must be positive, got {}", format_cents(*amount))
            }
            AccountError::AmountTooLarge(amount) => write!(
                f,
                "amount {} would take the balance out of range",
                format_cents(*amount)
            ),
            AccountError::InsufficientFunds {
                available,
                requested,
            } => write!(
                f,
                "insufficient funds: available {}, requested {}",
                format_cents(*available),
                format_cents(*requested)
            ),
        }
    }
}

impl std::error::Error for AccountError {}
