// 💳 Account Entity - Balance with validated mutations and threshold alerts
//
// Identity (account number, client number) is fixed at construction.
// The balance only moves through deposit/withdraw, which validate first and
// then route through a single update step that checks both thresholds and
// publishes to subscribed listeners.
//
// Not thread-safe: listeners are Rc handles, so an Account is !Send.
// A multi-threaded host serializes access itself.

use crate::config::Thresholds;
use crate::entities::notification::Notification;
use crate::error::{AccountError, InvalidArgument, Operation};
use crate::money::{format_currency, IntoAmount};
use crate::notifier::{Notifier, Observable, SharedListener};
use chrono::NaiveDate;
use std::fmt;
use std::rc::Rc;

/// Creation date used when none is supplied: 1970-01-01
///
/// Means "unknown", not a real opening date.
pub fn epoch_sentinel() -> NaiveDate {
    NaiveDate::default()
}

// ============================================================================
// SERVICE CHARGES
// ============================================================================

/// Fee policy of a concrete account variant
///
/// The core account has no fee formula. Variants wrap an `Account` and
/// decide what a service charge means for them (monthly fee, per-transaction
/// fee, ...).
pub trait ServiceChargeable {
    fn service_charges(&self) -> f64;
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug)]
pub struct Account {
    account_number: i64,
    client_number: i64,
    balance: f64,
    date_created: NaiveDate,
    thresholds: Thresholds,
    notifier: Notifier<Notification>,
}

impl Account {
    /// Create an account with a typed identity
    ///
    /// The balance may be any float-convertible value; non-numeric or
    /// non-finite input fails and no account is created.
    pub fn new<B: IntoAmount>(
        account_number: i64,
        client_number: i64,
        balance: B,
        date_created: Option<NaiveDate>,
    ) -> Result<Self, AccountError> {
        let balance = balance.into_amount().map_err(|input| {
            tracing::debug!(account_number, input = %input, "rejected opening balance");
            AccountError::from(InvalidArgument::Balance { input })
        })?;

        Ok(Account {
            account_number,
            client_number,
            balance,
            date_created: date_created.unwrap_or_else(epoch_sentinel),
            thresholds: Thresholds::default(),
            notifier: Notifier::new(),
        })
    }

    /// Create an account from text fields (CSV row, form input)
    ///
    /// Account and client numbers must be integers, the balance a finite
    /// float and the date, if present, `YYYY-MM-DD`.
    pub fn parse(
        account_number: &str,
        client_number: &str,
        balance: &str,
        date_created: Option<&str>,
    ) -> Result<Self, AccountError> {
        let account_number = account_number.trim().parse::<i64>().map_err(|_| {
            tracing::debug!(input = account_number, "rejected account number");
            AccountError::from(InvalidArgument::AccountNumber {
                input: account_number.to_string(),
            })
        })?;

        let client_number = client_number.trim().parse::<i64>().map_err(|_| {
            AccountError::from(InvalidArgument::ClientNumber {
                input: client_number.to_string(),
            })
        })?;

        let date_created = match date_created {
            Some(text) => Some(NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(
                |_| {
                    AccountError::from(InvalidArgument::DateCreated {
                        input: text.to_string(),
                    })
                },
            )?),
            None => None,
        };

        Account::new(account_number, client_number, balance, date_created)
    }

    /// Replace the default notification thresholds
    ///
    /// Non-finite limits are rejected: a NaN never compares true, so it
    /// would silently switch off both notifications.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Result<Self, AccountError> {
        if !thresholds.is_finite() {
            tracing::warn!(
                account_number = self.account_number,
                large_transaction_threshold = thresholds.large_transaction_threshold,
                low_balance_level = thresholds.low_balance_level,
                "thresholds rejected"
            );
            return Err(AccountError::from(InvalidArgument::Thresholds {
                large_transaction_threshold: thresholds.large_transaction_threshold,
                low_balance_level: thresholds.low_balance_level,
            }));
        }

        self.thresholds = thresholds;
        Ok(self)
    }

    pub fn account_number(&self) -> i64 {
        self.account_number
    }

    pub fn client_number(&self) -> i64 {
        self.client_number
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn date_created(&self) -> NaiveDate {
        self.date_created
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Number of listeners currently subscribed
    pub fn listener_count(&self) -> usize {
        self.notifier.len()
    }

    // ========================================================================
    // BALANCE MUTATIONS
    // ========================================================================

    /// Deposit a positive amount, returning the new balance
    pub fn deposit<A: IntoAmount>(&mut self, amount: A) -> Result<f64, AccountError> {
        let amount = self.validate_amount(Operation::Deposit, amount)?;

        if !(self.balance + amount).is_finite() {
            return Err(self.reject(InvalidArgument::BalanceOverflow {
                amount,
                balance: self.balance,
            }));
        }

        self.update_balance(amount);
        Ok(self.balance)
    }

    /// Withdraw a positive amount no larger than the balance, returning the new balance
    pub fn withdraw<A: IntoAmount>(&mut self, amount: A) -> Result<f64, AccountError> {
        let amount = self.validate_amount(Operation::Withdraw, amount)?;

        if amount > self.balance {
            return Err(self.reject(InvalidArgument::InsufficientFunds {
                amount,
                balance: self.balance,
            }));
        }

        self.update_balance(-amount);
        Ok(self.balance)
    }

    fn validate_amount<A: IntoAmount>(
        &self,
        operation: Operation,
        amount: A,
    ) -> Result<f64, AccountError> {
        let amount = amount
            .into_amount()
            .map_err(|input| self.reject(InvalidArgument::NonNumericAmount { operation, input }))?;

        if amount <= 0.0 {
            return Err(self.reject(InvalidArgument::NonPositiveAmount { operation, amount }));
        }

        Ok(amount)
    }

    fn reject(&self, reason: InvalidArgument) -> AccountError {
        tracing::warn!(account_number = self.account_number, %reason, "balance change rejected");
        AccountError::from(reason)
    }

    /// Apply an already-validated delta and check both thresholds
    fn update_balance(&mut self, delta: f64) {
        self.balance += delta;
        tracing::debug!(
            account_number = self.account_number,
            delta,
            balance = self.balance,
            "balance updated"
        );

        if self.balance < self.thresholds.low_balance_level {
            self.notify(Notification::low_balance(self.account_number, self.balance));
        }

        if self.balance > self.thresholds.large_transaction_threshold {
            self.notify(Notification::large_transaction(
                self.account_number,
                delta,
                self.balance,
            ));
        }
    }

    fn notify(&self, notification: Notification) {
        tracing::info!(
            account_number = self.account_number,
            kind = notification.kind.as_str(),
            listeners = self.notifier.len(),
            "publishing notification"
        );
        self.notifier.publish(&notification);
    }
}

impl Observable<Notification> for Account {
    fn subscribe(&mut self, listener: SharedListener<Notification>) {
        self.notifier.subscribe(listener);
    }

    fn unsubscribe<L: ?Sized>(&mut self, listener: &Rc<L>) -> bool {
        self.notifier.unsubscribe(listener)
    }

    fn publish(&self, message: &Notification) {
        self.notifier.publish(message);
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account Number: {} Balance: {}",
            self.account_number,
            format_currency(self.balance)
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::notification::NotificationKind;
    use rstest::rstest;
    use std::cell::RefCell;

    type Inbox = Rc<RefCell<Vec<Notification>>>;

    fn subscribed_account(balance: f64) -> (Account, Inbox) {
        let mut account = Account::new(1001, 5001, balance, None).unwrap();
        let inbox: Inbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&inbox);
        account.subscribe(Rc::new(move |n: &Notification| sink.borrow_mut().push(n.clone())));
        (account, inbox)
    }

    /// Minimal variant used to exercise the fee extension point
    struct FlatFeeAccount {
        account: Account,
        monthly_fee: f64,
    }

    impl ServiceChargeable for FlatFeeAccount {
        fn service_charges(&self) -> f64 {
            if self.account.balance() < self.account.thresholds().low_balance_level {
                self.monthly_fee
            } else {
                0.0
            }
        }
    }

    #[test]
    fn test_account_creation() {
        let account = Account::new(1001, 5001, 100.0, None).unwrap();

        assert_eq!(account.account_number(), 1001);
        assert_eq!(account.client_number(), 5001);
        assert_eq!(account.balance(), 100.0);
        assert_eq!(account.date_created(), epoch_sentinel());
        assert_eq!(account.date_created().to_string(), "1970-01-01");
        assert_eq!(account.listener_count(), 0);
    }

    #[test]
    fn test_account_creation_with_date() {
        let opened = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let account = Account::new(1, 2, 0, Some(opened)).unwrap();
        assert_eq!(account.date_created(), opened);
    }

    #[test]
    fn test_account_creation_from_text_balance() {
        let account = Account::new(1001, 5001, "250.75", None).unwrap();
        assert_eq!(account.balance(), 250.75);
    }

    #[test]
    fn test_account_creation_rejects_bad_balance() {
        let err = Account::new(1001, 5001, "lots", None).unwrap_err();
        assert_eq!(
            err,
            AccountError::InvalidArgument(InvalidArgument::Balance {
                input: "lots".to_string()
            })
        );

        assert!(Account::new(1001, 5001, f64::NAN, None).is_err());
    }

    #[test]
    fn test_parse() {
        let account = Account::parse("1001", "5001", "100.0", Some("2023-07-01")).unwrap();
        assert_eq!(account.account_number(), 1001);
        assert_eq!(account.client_number(), 5001);
        assert_eq!(account.balance(), 100.0);
        assert_eq!(
            account.date_created(),
            NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()
        );
    }

    #[rstest]
    #[case("10.5", "5001", "100", None)]
    #[case("abc", "5001", "100", None)]
    #[case("", "5001", "100", None)]
    fn test_parse_rejects_account_number(
        #[case] account_number: &str,
        #[case] client_number: &str,
        #[case] balance: &str,
        #[case] date: Option<&str>,
    ) {
        let err = Account::parse(account_number, client_number, balance, date).unwrap_err();
        assert!(matches!(err.reason(), InvalidArgument::AccountNumber { .. }));
    }

    #[test]
    fn test_parse_rejects_each_field() {
        let err = Account::parse("1001", "x1", "100", None).unwrap_err();
        assert!(matches!(err.reason(), InvalidArgument::ClientNumber { .. }));
        assert_eq!(err.to_string(), "client number is invalid: x1");

        let err = Account::parse("1001", "5001", "1,000", None).unwrap_err();
        assert!(matches!(err.reason(), InvalidArgument::Balance { .. }));

        let err = Account::parse("1001", "5001", "100", Some("03/15/2024")).unwrap_err();
        assert!(matches!(err.reason(), InvalidArgument::DateCreated { .. }));
    }

    #[test]
    fn test_deposit() {
        let (mut account, inbox) = subscribed_account(100.0);
        assert_eq!(account.deposit(25.5).unwrap(), 125.5);
        assert_eq!(account.balance(), 125.5);
        assert!(inbox.borrow().is_empty());
    }

    #[rstest]
    #[case(0.0, "Deposit amount: $0.00 must be positive.")]
    #[case(-5.0, "Deposit amount: $-5.00 must be positive.")]
    fn test_deposit_rejects_non_positive(#[case] amount: f64, #[case] message: &str) {
        let (mut account, inbox) = subscribed_account(100.0);
        let err = account.deposit(amount).unwrap_err();

        assert_eq!(err.to_string(), message);
        assert_eq!(account.balance(), 100.0);
        assert!(inbox.borrow().is_empty());
    }

    #[test]
    fn test_deposit_rejects_non_numeric() {
        let (mut account, _) = subscribed_account(100.0);
        let err = account.deposit("ten").unwrap_err();

        assert_eq!(err.to_string(), "Deposit amount: ten must be numeric.");
        assert_eq!(account.balance(), 100.0);
    }

    #[test]
    fn test_deposit_rejects_overflow() {
        let mut account = Account::new(1, 1, f64::MAX, None).unwrap();
        let err = account.deposit(f64::MAX).unwrap_err();

        assert!(matches!(err.reason(), InvalidArgument::BalanceOverflow { .. }));
        assert!(err.to_string().contains(&format_currency(f64::MAX)));
        assert_eq!(account.balance(), f64::MAX);
    }

    #[test]
    fn test_withdraw() {
        let (mut account, inbox) = subscribed_account(500.0);
        assert_eq!(account.withdraw("200").unwrap(), 300.0);
        assert!(inbox.borrow().is_empty());
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let (mut account, inbox) = subscribed_account(100.0);
        assert_eq!(account.withdraw(100).unwrap(), 0.0);
        assert_eq!(inbox.borrow().len(), 1);
    }

    #[test]
    fn test_withdraw_rejects_non_positive() {
        let (mut account, _) = subscribed_account(100.0);
        let err = account.withdraw(-1).unwrap_err();

        assert_eq!(err.to_string(), "Withdraw amount: $-1.00 must be positive.");
        assert_eq!(account.balance(), 100.0);
    }

    #[test]
    fn test_withdraw_insufficient_funds() {
        let (mut account, inbox) = subscribed_account(100.0);
        let err = account.withdraw(500).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("$500.00"));
        assert!(message.contains("$100.00"));
        assert_eq!(
            err.reason(),
            &InvalidArgument::InsufficientFunds {
                amount: 500.0,
                balance: 100.0
            }
        );
        assert_eq!(account.balance(), 100.0);
        assert!(inbox.borrow().is_empty());
    }

    #[test]
    fn test_low_balance_notification() {
        let (mut account, inbox) = subscribed_account(100.0);
        account.withdraw(60).unwrap();

        assert_eq!(account.balance(), 40.0);
        let inbox = inbox.borrow();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].account_number, 1001);
        assert_eq!(inbox[0].kind, NotificationKind::LowBalance { balance: 40.0 });
        assert_eq!(inbox[0].message(), "Low balance warning 40.0: on account 1001");
    }

    #[test]
    fn test_large_transaction_notification() {
        let (mut account, inbox) = subscribed_account(100.0);
        account.deposit(10000).unwrap();

        assert_eq!(account.balance(), 10100.0);
        let inbox = inbox.borrow();
        assert_eq!(inbox.len(), 1);
        assert_eq!(
            inbox[0].kind,
            NotificationKind::LargeTransaction {
                delta: 10000.0,
                balance: 10100.0
            }
        );
        let message = inbox[0].message();
        assert!(message.contains("10000"));
        assert!(message.contains("10100.0"));
    }

    #[test]
    fn test_large_balance_notifies_on_withdrawal_too() {
        let (mut account, inbox) = subscribed_account(20000.0);
        account.withdraw(1000).unwrap();

        let inbox = inbox.borrow();
        assert_eq!(inbox.len(), 1);
        assert_eq!(
            inbox[0].kind,
            NotificationKind::LargeTransaction {
                delta: -1000.0,
                balance: 19000.0
            }
        );
    }

    #[test]
    fn test_low_balance_repeats_on_each_update() {
        let (mut account, inbox) = subscribed_account(10.0);
        account.deposit(5).unwrap();
        account.withdraw(3).unwrap();

        let balances: Vec<f64> = inbox
            .borrow()
            .iter()
            .map(|n| match n.kind {
                NotificationKind::LowBalance { balance } => balance,
                NotificationKind::LargeTransaction { .. } => panic!("unexpected"),
            })
            .collect();
        assert_eq!(balances, vec![15.0, 12.0]);
    }

    #[test]
    fn test_both_thresholds_fire_when_they_overlap() {
        let thresholds = Thresholds {
            large_transaction_threshold: 10.0,
            low_balance_level: 100.0,
        };
        let (account, inbox) = subscribed_account(0.0);
        let mut account = account.with_thresholds(thresholds).unwrap();
        account.deposit(50).unwrap();

        let inbox = inbox.borrow();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].kind.as_str(), "low_balance");
        assert_eq!(inbox[1].kind.as_str(), "large_transaction");
    }

    #[rstest]
    #[case(f64::NAN, 50.0)]
    #[case(9999.99, f64::NAN)]
    #[case(f64::INFINITY, 50.0)]
    #[case(9999.99, f64::NEG_INFINITY)]
    fn test_with_thresholds_rejects_non_finite(#[case] large: f64, #[case] low: f64) {
        let thresholds = Thresholds {
            large_transaction_threshold: large,
            low_balance_level: low,
        };
        let err = Account::new(1, 1, 100.0, None)
            .unwrap()
            .with_thresholds(thresholds)
            .unwrap_err();

        assert!(matches!(err.reason(), InvalidArgument::Thresholds { .. }));
    }

    #[test]
    fn test_with_thresholds_keeps_low_balance_alert_working() {
        let thresholds = Thresholds {
            large_transaction_threshold: 9999.99,
            low_balance_level: 10.0,
        };
        let (account, inbox) = subscribed_account(100.0);
        let mut account = account.with_thresholds(thresholds).unwrap();

        account.withdraw(85).unwrap();
        assert!(inbox.borrow().is_empty());

        account.withdraw(10).unwrap();
        assert_eq!(inbox.borrow().len(), 1);
        assert_eq!(account.thresholds(), &thresholds);
    }

    #[test]
    fn test_unsubscribed_listener_stops_receiving() {
        let mut account = Account::new(1001, 5001, 100.0, None).unwrap();
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        let listener: SharedListener<Notification> =
            Rc::new(move |_: &Notification| *counter.borrow_mut() += 1);

        account.subscribe(listener.clone());
        account.withdraw(60).unwrap();
        assert!(account.unsubscribe(&listener));
        account.withdraw(10).unwrap();

        assert_eq!(*seen.borrow(), 1);
        assert!(!account.unsubscribe(&listener));
        assert_eq!(account.listener_count(), 0);
    }

    #[test]
    fn test_publish_reaches_listeners_directly() {
        let (account, inbox) = subscribed_account(100.0);
        account.publish(&Notification::low_balance(1001, 1.0));
        assert_eq!(inbox.borrow().len(), 1);
    }

    #[rstest]
    #[case(1234.5, "Account Number: 1001 Balance: $1,234.50")]
    #[case(0.0, "Account Number: 1001 Balance: $0.00")]
    #[case(1000000.0, "Account Number: 1001 Balance: $1,000,000.00")]
    fn test_display(#[case] balance: f64, #[case] expected: &str) {
        let account = Account::new(1001, 5001, balance, None).unwrap();
        assert_eq!(account.to_string(), expected);
    }

    #[test]
    fn test_service_charges_variant() {
        let mut variant = FlatFeeAccount {
            account: Account::new(1001, 5001, 100.0, None).unwrap(),
            monthly_fee: 4.5,
        };
        assert_eq!(variant.service_charges(), 0.0);

        variant.account.withdraw(80).unwrap();
        assert_eq!(variant.service_charges(), 4.5);
    }
}
