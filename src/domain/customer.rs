use super::Account;

/// A bank customer, keyed by national id, owning one or more accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub national_id: String,
    pub full_name: String,
    pub address: String,
    accounts: Vec<Account>,
}

impl Customer {
    pub fn new(
        national_id: impl Into<String>,
        full_name: impl Into<String>,
        address: impl Into<String>,
        accounts: Vec<Account>,
    ) -> Self {
        Self {
            national_id: national_id.into(),
            full_name: full_name.into(),
            address: address.into(),
            accounts,
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn push_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    pub fn find_account(&self, number: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.number() == number)
    }

    pub fn find_account_mut(&mut self, number: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.number() == number)
    }

    /// Render an 11-digit id as `###.###.###-##`; other ids are shown as-is.
    pub fn national_id_formatted(&self) -> String {
        format_national_id(&self.national_id)
    }
}

pub fn format_national_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() != 11 {
        return id.to_string();
    }
    let part = |range: std::ops::Range<usize>| chars[range].iter().collect::<String>();
    format!("{}.{}.{}-{}", part(0..3), part(3..6), part(6..9), part(9..11))
}
