use indexmap::IndexMap;

use super::Customer;

/// Every customer, keyed by national id, in the order they were registered
/// (or appear in the document).
pub type Population = IndexMap<String, Customer>;

/// Account numbers are allocated above this value; the first account is 100001.
pub const ACCOUNT_NUMBER_FLOOR: u64 = 100_000;

/// Pick the next account number: one more than the highest number in use.
///
/// Numbers that do not parse as integers, or that have no successor, are
/// ignored, so a hand-edited document can't block allocation.
pub fn next_account_number(population: &Population) -> String {
    population
        .values()
        .flat_map(|customer| customer.accounts())
        .filter_map(|account| account.number().parse::<u64>().ok())
        .filter_map(|number| number.checked_add(1))
        .fold(ACCOUNT_NUMBER_FLOOR + 1, u64::max)
        .to_string()
}
