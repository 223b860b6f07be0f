//! Chart-of-accounts directory: tree, folder navigation and search

pub mod error;
pub mod tree;
pub mod navigation;
pub mod search;
pub mod expansion;
pub mod view;
pub mod directory;
pub mod summary;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use tree::{AccountForest, AccountNode};
pub use navigation::{Crumb, Navigation};
pub use search::{auto_expand_targets, search_view, SearchMatches};
pub use expansion::ExpansionState;
pub use view::{DirectoryView, ViewMode, ViewRow};
pub use directory::Directory;
pub use summary::DirectorySummary;

pub use coaweb_store::{AccountDraft, AccountId, AccountRecord, AccountType, LedgerTotals};
