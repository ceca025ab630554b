// ⚠️ Account Errors - one error kind, structured reasons
//
// Every rejection in the balance protocol is an InvalidArgument.
// The reason says which rule failed and carries the offending values,
// so callers match on the variant instead of the message text.

use crate::money::format_currency;
use std::fmt;
use thiserror::Error;

// ============================================================================
// ACCOUNT ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidArgument(InvalidArgument),
}

impl AccountError {
    pub fn reason(&self) -> &InvalidArgument {
        match self {
            AccountError::InvalidArgument(reason) => reason,
        }
    }
}

impl From<InvalidArgument> for AccountError {
    fn from(reason: InvalidArgument) -> Self {
        AccountError::InvalidArgument(reason)
    }
}

// ============================================================================
// INVALID ARGUMENT REASONS
// ============================================================================

/// Which operation an amount was rejected for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deposit,
    Withdraw,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "Deposit",
            Operation::Withdraw => "Withdraw",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidArgument {
    /// Account number is not an integer
    AccountNumber { input: String },

    /// Client number is not an integer
    ClientNumber { input: String },

    /// Opening balance is not a finite float
    Balance { input: String },

    /// Creation date is not an ISO-8601 date
    DateCreated { input: String },

    /// Amount is not a finite number
    NonNumericAmount { operation: Operation, input: String },

    /// Amount is zero or negative
    NonPositiveAmount { operation: Operation, amount: f64 },

    /// Withdrawal exceeds the current balance
    InsufficientFunds { amount: f64, balance: f64 },

    /// Deposit would push the balance past the largest finite float
    BalanceOverflow { amount: f64, balance: f64 },

    /// A notification threshold is NaN or infinite
    Thresholds {
        large_transaction_threshold: f64,
        low_balance_level: f64,
    },
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgument::AccountNumber { input } => {
                write!(f, "account number is invalid: {}", input)
            }
            InvalidArgument::ClientNumber { input } => {
                write!(f, "client number is invalid: {}", input)
            }
            InvalidArgument::Balance { input } => {
                write!(f, "balance is invalid: {} is not a number", input)
            }
            InvalidArgument::DateCreated { input } => {
                write!(f, "date created is invalid: {} is not a YYYY-MM-DD date", input)
            }
            InvalidArgument::NonNumericAmount { operation, input } => {
                write!(f, "{} amount: {} must be numeric.", operation.as_str(), input)
            }
            InvalidArgument::NonPositiveAmount { operation, amount } => write!(
                f,
                "{} amount: {} must be positive.",
                operation.as_str(),
                format_currency(*amount)
            ),
            InvalidArgument::InsufficientFunds { amount, balance } => write!(
                f,
                "Withdrawal amount: {} must not exceed the current account balance: {}",
                format_currency(*amount),
                format_currency(*balance)
            ),
            InvalidArgument::BalanceOverflow { amount, balance } => write!(
                f,
                "Deposit amount: {} would overflow the current account balance: {}",
                format_currency(*amount),
                format_currency(*balance)
            ),
            InvalidArgument::Thresholds {
                large_transaction_threshold,
                low_balance_level,
            } => write!(
                f,
                "thresholds are invalid: large transaction threshold {} and low balance level {} must be finite",
                large_transaction_threshold, low_balance_level
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
