//! Account records as supplied by the persistence layer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stable account identifier
pub type AccountId = u64;

/// Maximum length of an account code
pub const MAX_CODE_LEN: usize = 20;

/// Maximum length of an account name
pub const MAX_NAME_LEN: usize = 100;

/// Account type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset accounts (cash, banks, inventory)
    Asset,
    /// Liability accounts (payables, taxes due)
    Liability,
    /// Equity accounts (capital)
    Equity,
    /// Income accounts (sales)
    Income,
    /// Expense accounts (cost of goods, administration)
    Expense,
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Asset
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" | "assets" => Ok(AccountType::Asset),
            "liability" | "liabilities" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "income" => Ok(AccountType::Income),
            "expense" | "expenses" => Ok(AccountType::Expense),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Asset => write!(f, "asset"),
            AccountType::Liability => write!(f, "liability"),
            AccountType::Equity => write!(f, "equity"),
            AccountType::Income => write!(f, "income"),
            AccountType::Expense => write!(f, "expense"),
        }
    }
}

/// One row of the flat chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Unique, stable identifier
    pub id: AccountId,
    /// Parent account; `None` for a root
    #[serde(default)]
    pub parent_id: Option<AccountId>,
    /// Account code (e.g. "111")
    pub code: String,
    /// Display name
    pub name: String,
    /// Account type
    pub account_type: AccountType,
    /// Usable as a posting target; `false` for pure grouping accounts
    #[serde(default = "default_selectable")]
    pub is_selectable: bool,
    /// Current balance, computed by the posting engine
    #[serde(default)]
    pub balance: Decimal,
}

fn default_selectable() -> bool {
    true
}

impl AccountRecord {
    /// Case-insensitive substring match against code and name
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }

    /// Display label in "code - name" form
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Create/update payload for an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDraft {
    #[serde(default)]
    pub parent_id: Option<AccountId>,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    #[serde(default = "default_selectable")]
    pub is_selectable: bool,
}

impl AccountDraft {
    pub fn new(code: &str, name: &str, account_type: AccountType) -> Self {
        Self {
            parent_id: None,
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            is_selectable: true,
        }
    }

    pub fn under(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn container(mut self) -> Self {
        self.is_selectable = false;
        self
    }
}

/// Aggregate figures produced by the reporting side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

impl LedgerTotals {
    /// Sum supplied balances per account type
    pub fn from_records(records: &[AccountRecord]) -> Self {
        let mut totals = LedgerTotals::default();
        for record in records {
            match record.account_type {
                AccountType::Asset => totals.total_assets += record.balance,
                AccountType::Liability => totals.total_liabilities += record.balance,
                AccountType::Equity => totals.total_equity += record.balance,
                AccountType::Income => totals.total_income += record.balance,
                AccountType::Expense => totals.total_expenses += record.balance,
            }
        }
        totals.net_profit = totals.total_income - totals.total_expenses;
        totals
    }
}
