//! Data models module
//!
//! Records exchanged with the backend and the client-local entities

pub mod user;
pub mod payment;
pub mod withdrawal;
pub mod translation;
pub mod tariff;
pub mod product;
pub mod coin;
pub mod notification;
pub mod statistics;

// Re-export commonly used models
pub use user::{User, UserStatus};
pub use payment::{Payment, PaymentStatus};
pub use withdrawal::{Withdrawal, WithdrawalStatus};
pub use translation::Translation;
pub use tariff::{Tariff, TariffDraft, TariffActivation};
pub use product::{Product, ProductDraft, PhotoUrl};
pub use coin::{Coin, CoinDraft};
pub use notification::{Notification, NotificationDraft, NotificationType, Recipients};
pub use statistics::{WebStatistics, UserStatistic, DailyWithdrawal, MonthlyWithdrawal, Bar};
