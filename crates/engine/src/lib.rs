//! Domain engine for moim: shared group wallets, deposits and expenses.
//!
//! Every mutating operation runs inside one database transaction, so the
//! pooled group balance, member wallets and personal accounts always move
//! together.

pub use commands::{
    AccountCmd, AddExpenseCmd, CreateGroupCmd, DepositCmd, RegisterUserCmd, UpdateExpenseCmd,
    UpdateGroupCmd,
};
pub use error::EngineError;
pub use expenses::{DEFAULT_CATEGORIES, Expense};
pub use groups::{Group, GroupStatus, top_priority_group};
pub use money::Won;
pub use notices::Notice;
pub use notifications::{Notification, NotificationKind};
pub use ops::{DepositReminder, Engine, EngineBuilder, JoinPreview, LatestNotice};
pub use participants::Participant;
pub use stats::{CategoryTotal, DailyTotal, MonthlySummary, MonthlyTotal, YearMonth};
pub use users::{Account, User};
pub use wallets::Wallet;

mod commands;
mod credentials;
mod deposits;
mod error;
mod expenses;
mod groups;
mod money;
mod notices;
mod notifications;
mod ops;
mod participants;
mod stats;
mod users;
mod util;
mod wallets;
mod withdrawn_users;

type ResultEngine<T> = Result<T, EngineError>;
