use chrono::Local;

use super::{format_cents, Cents};

/// Layout used for transaction timestamps, both on screen and in the document.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An entry in an account's statement. Never modified after creation.
///
/// The timestamp is kept exactly as recorded, in [`TIMESTAMP_FORMAT`] for
/// entries made here, and verbatim for entries read from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    kind: TransactionKind,
    amount_cents: Cents,
    timestamp: String,
}

impl Transaction {
    /// Record a transaction happening now (local time).
    pub fn new(kind: TransactionKind, amount_cents: Cents) -> Self {
        Self::at(
            kind,
            amount_cents,
            Local::now().format(TIMESTAMP_FORMAT).to_string(),
        )
    }

    /// Rebuild a transaction with a known timestamp.
    pub fn at(kind: TransactionKind, amount_cents: Cents, timestamp: impl Into<String>) -> Self {
        Self {
            kind,
            amount_cents,
            timestamp: timestamp.into(),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount_cents(&self) -> Cents {
        self.amount_cents
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {}: R$ {}",
            self.timestamp,
            self.kind,
            format_cents(self.amount_cents)
        )
    }
}
