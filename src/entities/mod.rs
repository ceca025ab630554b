// Entity Models
//
// Account owns identity and balance; Notification is what it publishes
// when a balance update crosses a threshold.

pub mod account;
pub mod notification;

pub use account::{epoch_sentinel, Account, ServiceChargeable};
pub use notification::{Notification, NotificationKind};
