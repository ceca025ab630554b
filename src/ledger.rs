// 📒 Ledger Replay - Apply a CSV of deposits/withdrawals to one account
//
// CSV format (header required):
//   operation,amount
//   deposit,250.00
//   withdraw,75.5
//
// Amounts stay as text until the account validates them, so a bad cell
// becomes a recorded rejection instead of a parse failure for the file.

use crate::entities::Account;
use crate::error::AccountError;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

// ============================================================================
// LEDGER ENTRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerOperation {
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub operation: LedgerOperation,
    pub amount: String,
}

impl LedgerEntry {
    pub fn deposit(amount: &str) -> Self {
        LedgerEntry {
            operation: LedgerOperation::Deposit,
            amount: amount.to_string(),
        }
    }

    pub fn withdraw(amount: &str) -> Self {
        LedgerEntry {
            operation: LedgerOperation::Withdraw,
            amount: amount.to_string(),
        }
    }

    /// Apply this entry to an account, returning the new balance
    pub fn apply(&self, account: &mut Account) -> Result<f64, AccountError> {
        match self.operation {
            LedgerOperation::Deposit => account.deposit(self.amount.as_str()),
            LedgerOperation::Withdraw => account.withdraw(self.amount.as_str()),
        }
    }
}

/// Load ledger entries from a CSV file
pub fn load_ledger(path: &Path) -> Result<Vec<LedgerEntry>> {
    let rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open ledger file: {:?}", path))?;
    read_entries(rdr)
}

/// Load ledger entries from any CSV reader (stdin, in-memory buffers)
pub fn read_ledger<R: Read>(reader: R) -> Result<Vec<LedgerEntry>> {
    read_entries(csv::Reader::from_reader(reader))
}

fn read_entries<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<LedgerEntry>> {
    let mut entries = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // +2: header is line 1
        let entry: LedgerEntry = result
            .with_context(|| format!("Failed to deserialize ledger entry on line {}", index + 2))?;
        entries.push(entry);
    }

    Ok(entries)
}

// ============================================================================
// REPLAY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// 1-based position of the entry in the ledger
    pub line: usize,
    pub entry: LedgerEntry,
    pub error: AccountError,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: Vec<Rejection>,
}

impl ReplaySummary {
    pub fn summary(&self) -> String {
        format!("Applied: {}, Rejected: {}", self.applied, self.rejected.len())
    }
}

/// Apply every entry in order; rejected entries are recorded and skipped
pub fn replay(account: &mut Account, entries: &[LedgerEntry]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for (index, entry) in entries.iter().enumerate() {
        match entry.apply(account) {
            Ok(_) => summary.applied += 1,
            Err(error) => summary.rejected.push(Rejection {
                line: index + 1,
                entry: entry.clone(),
                error,
            }),
        }
    }

    tracing::info!(
        account_number = account.account_number(),
        applied = summary.applied,
        rejected = summary.rejected.len(),
        "ledger replayed"
    );

    summary
}

// ============================================================================
// TESTS
// ============================================================================
