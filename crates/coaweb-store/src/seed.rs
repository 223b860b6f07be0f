//! Standard chart of accounts used to seed an empty store

use rust_decimal::Decimal;

use crate::types::{AccountId, AccountRecord, AccountType};

// (id, parent, code, name, type, selectable)
const DEFAULT_CHART: &[(AccountId, Option<AccountId>, &str, &str, AccountType, bool)] = &[
    (1, None, "1", "Assets", AccountType::Asset, false),
    (2, Some(1), "11", "Current Assets", AccountType::Asset, false),
    (3, Some(2), "111", "Cash & Banks", AccountType::Asset, false),
    (4, Some(2), "112", "Customers & Receivables", AccountType::Asset, false),
    (5, Some(2), "113", "Inventory", AccountType::Asset, false),
    (6, Some(2), "114", "VAT - Input", AccountType::Asset, true),
    (7, Some(1), "12", "Fixed Assets", AccountType::Asset, false),
    (8, None, "2", "Liabilities", AccountType::Liability, false),
    (9, Some(8), "21", "Current Liabilities", AccountType::Liability, false),
    (10, Some(9), "211", "Suppliers & Payables", AccountType::Liability, false),
    (11, Some(9), "212", "VAT - Output", AccountType::Liability, true),
    (12, None, "3", "Equity", AccountType::Equity, false),
    (13, Some(12), "31", "Capital", AccountType::Equity, true),
    (14, None, "4", "Revenue", AccountType::Income, false),
    (15, Some(14), "41", "Sales", AccountType::Income, true),
    (16, None, "5", "Expenses", AccountType::Expense, false),
    (17, Some(16), "51", "Cost of Goods Sold", AccountType::Expense, true),
    (18, Some(16), "52", "General & Administrative Expenses", AccountType::Expense, true),
];

/// The standard chart: five type roots, grouping accounts below them,
/// and the posting accounts every installation needs.
pub fn default_chart() -> Vec<AccountRecord> {
    DEFAULT_CHART
        .iter()
        .map(|&(id, parent_id, code, name, account_type, is_selectable)| AccountRecord {
            id,
            parent_id,
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            is_selectable,
            balance: Decimal::ZERO,
        })
        .collect()
}
