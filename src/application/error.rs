use thiserror::Error;

use crate::domain::{format_cents, AccountError, Cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Customer already exists: {0}")]
    CustomerAlreadyExists(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error(
        "Insufficient funds in account {account}: available {}, requested {}",
        format_cents(*.available),
        format_cents(*.requested)
    )]
    InsufficientFunds {
        account: String,
        available: Cents,
        requested: Cents,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// Attach the account number to a failed deposit or withdrawal.
    pub(crate) fn from_account(account: &str, err: AccountError) -> Self {
        match err {
            AccountError::NonPositiveAmount(_) | AccountError::AmountTooLarge(_) => {
                AppError::InvalidAmount(err.to_string())
            }
            AccountError::InsufficientFunds {
                available,
                requested,
            } => AppError::InsufficientFunds {
                account: account.to_string(),
                available,
                requested,
            },
        }
    }
}
