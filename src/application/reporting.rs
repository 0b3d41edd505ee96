use std::fmt::Write;

use crate::domain::{format_cents, Cents, Transaction};

/// Owner names longer than this are cut in the account listing.
pub const OWNER_NAME_WIDTH: usize = 20;

/// One line of the account listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountListing {
    pub account_number: String,
    pub owner_name: String,
    pub national_id: String,
    pub available: Cents,
}

/// Everything shown for the `e` (statement) command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub account_number: String,
    pub transactions: Vec<Transaction>,
    pub balance: Cents,
    pub available: Cents,
}

pub fn truncate_name(name: &str) -> String {
    name.chars().take(OWNER_NAME_WIDTH).collect()
}

pub fn render_account_listing(rows: &[AccountListing]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<20} {:<15} {:>15}",
        "ACCOUNT", "OWNER", "NATIONAL ID", "AVAILABLE"
    );
    let _ = writeln!(out, "{}", "-".repeat(65));
    for row in rows {
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:<15} R$ {:>12}",
            row.account_number,
            row.owner_name,
            row.national_id,
            format_cents(row.available)
        );
    }
    out
}

pub fn render_statement(statement: &Statement) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Statement for account {} ---", statement.account_number);
    if statement.transactions.is_empty() {
        let _ = writeln!(out, "No transactions.");
    }
    for transaction in &statement.transactions {
        let _ = writeln!(out, "{}", transaction);
    }
    let _ = writeln!(
        out,
        "Balance: R$ {} | Available: R$ {}",
        format_cents(statement.balance),
        format_cents(statement.available)
    );
    out
}
