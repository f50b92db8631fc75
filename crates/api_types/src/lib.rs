use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignUp {
        pub username: String,
        pub password: String,
        pub nickname: String,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Profile {
        pub username: String,
        pub nickname: String,
        pub email: String,
        pub has_pin: bool,
        pub has_account: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NicknameUpdate {
        pub nickname: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordUpdate {
        pub current: String,
        pub new_password: String,
    }

    /// Personal bank account. `balance` is in won.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Account {
        pub bank: String,
        pub number: String,
        pub balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountResponse {
        pub account: Option<Account>,
    }
}

pub mod pin {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PinRegister {
        pub pin: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PinVerify {
        pub pin: String,
    }

    /// Send `token` back in the `x-pin-token` header to unlock sensitive
    /// routes until `expires_in_secs` elapse.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PinToken {
        pub token: String,
        pub expires_in_secs: u64,
    }
}

pub mod group {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GroupStatus {
        Recruiting,
        InProgress,
        Finished,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: String,
        #[serde(default)]
        pub participants: Vec<String>,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub due_date: NaiveDate,
        pub total_budget: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GroupUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub due_date: Option<NaiveDate>,
        pub total_budget: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub creator_id: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub due_date: NaiveDate,
        pub total_budget: i64,
        pub balance: i64,
        pub participant_count: i32,
        pub fee_per_person: i64,
        pub status: GroupStatus,
        /// `true` once the group has finished; clients disable editing.
        pub closed: bool,
        pub is_owner: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupList {
        pub groups: Vec<GroupView>,
    }
}

pub mod participant {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantView {
        pub id: Uuid,
        pub nickname: String,
        pub user_id: Option<String>,
        pub is_owner: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantList {
        pub participants: Vec<ParticipantView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Invite {
        pub nickname: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Invited {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Join {
        pub participant_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct JoinPreview {
        pub group_id: Uuid,
        pub name: String,
        pub description: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub due_date: NaiveDate,
        pub total_budget: i64,
        pub participants: Vec<ParticipantView>,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub group_id: Uuid,
        pub user_id: String,
        pub balance: i64,
        pub paid: bool,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        pub amount: i64,
        /// Retrying with the same key does not deposit twice.
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaidList {
        pub paid: Vec<String>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub date: NaiveDate,
        pub amount: i64,
        pub category: String,
        pub memo: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub date: Option<NaiveDate>,
        pub amount: Option<i64>,
        pub category: Option<String>,
        pub memo: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub amount: i64,
        pub category: String,
        pub memo: Option<String>,
        pub author: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDelete {
        pub ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesDeleted {
        pub restored: i64,
    }
}

pub mod notice {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NoticeNew {
        pub title: String,
        pub content: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NoticeCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NoticeView {
        pub id: Uuid,
        pub title: String,
        pub content: String,
        pub author: String,
        pub author_nickname: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NoticeList {
        pub notices: Vec<NoticeView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NoticeDelete {
        pub ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NoticesDeleted {
        pub deleted: u64,
    }
}

/// Shared query string for list endpoints.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

pub mod notification {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum NotificationKind {
        Announcement,
        Expense,
        Deposit,
        Join,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationView {
        pub id: Uuid,
        pub kind: NotificationKind,
        pub group_id: Uuid,
        pub group_name: String,
        pub message: String,
        pub read: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationList {
        pub notifications: Vec<NotificationView>,
        pub unread: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MarkedRead {
        pub updated: u64,
    }
}

pub mod stats {
    use super::*;

    /// Query string of the monthly endpoints: `?month=yyyy-MM`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthQuery {
        pub month: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        pub total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummary {
        pub month: String,
        pub total: i64,
        pub categories: Vec<CategoryTotal>,
        pub top: Option<CategoryTotal>,
        pub bottom: Option<CategoryTotal>,
        pub remaining: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyTotal {
        pub date: NaiveDate,
        pub total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyTotals {
        pub days: Vec<DailyTotal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTotal {
        /// `yyyy-MM`
        pub month: String,
        pub total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTrend {
        pub months: Vec<MonthlyTotal>,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositReminder {
        pub group_id: Uuid,
        pub group_name: String,
        pub due_date: NaiveDate,
        pub days_left: i64,
        pub fee_per_person: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LatestNotice {
        pub group_id: Uuid,
        pub group_name: String,
        pub title: String,
        pub author_nickname: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Dashboard {
        pub top_group: Option<group::GroupView>,
        pub reminders: Vec<DepositReminder>,
        pub latest_notices: Vec<LatestNotice>,
        pub unread_notifications: u64,
    }
}
