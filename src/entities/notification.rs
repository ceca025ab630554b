// 🔔 Notification - Threshold-crossing event
//
// Published by an account after a balance update lands beyond one of its
// thresholds. Display renders the human message; serde gives listeners a
// JSON form they can forward elsewhere.

use crate::money::format_plain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// NOTIFICATION KIND
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    /// Balance fell below the low-balance level
    LowBalance { balance: f64 },

    /// Balance rose above the large-transaction threshold
    LargeTransaction { delta: f64, balance: f64 },
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LowBalance { .. } => "low_balance",
            NotificationKind::LargeTransaction { .. } => "large_transaction",
        }
    }
}

// ============================================================================
// NOTIFICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub account_number: i64,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(account_number: i64, kind: NotificationKind) -> Self {
        Notification {
            id: Uuid::new_v4(),
            account_number,
            occurred_at: Utc::now(),
            kind,
        }
    }

    pub fn low_balance(account_number: i64, balance: f64) -> Self {
        Self::new(account_number, NotificationKind::LowBalance { balance })
    }

    pub fn large_transaction(account_number: i64, delta: f64, balance: f64) -> Self {
        Self::new(account_number, NotificationKind::LargeTransaction { delta, balance })
    }

    /// Rendered message text
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NotificationKind::LowBalance { balance } => write!(
                f,
                "Low balance warning {}: on account {}",
                format_plain(*balance),
                self.account_number
            ),
            NotificationKind::LargeTransaction { delta, balance } => write!(
                f,
                "Large transaction {}: on account {}\nDetails: updated balance is {}",
                format_plain(*delta),
                self.account_number,
                format_plain(*balance)
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
