// Bank Account - Core Library
// Balance model with validated mutations and threshold notifications

pub mod config;
pub mod entities;
pub mod error;
pub mod ledger;
pub mod money;
pub mod notifier;

// Re-export commonly used types
pub use config::{Thresholds, LARGE_TRANSACTION_THRESHOLD, LOW_BALANCE_LEVEL};
pub use entities::{
    epoch_sentinel, Account, Notification, NotificationKind, ServiceChargeable,
};
pub use error::{AccountError, InvalidArgument, Operation};
pub use ledger::{
    load_ledger, read_ledger, replay, LedgerEntry, LedgerOperation, Rejection, ReplaySummary,
};
pub use money::{format_currency, format_plain, IntoAmount};
pub use notifier::{Listener, Notifier, Observable, SharedListener};
