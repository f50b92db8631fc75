//! Command structs for engine operations.
//!
//! These types group parameters for write operations (signup, group
//! creation, deposits, expenses), keeping call sites readable and avoiding
//! long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

/// Register a new user.
#[derive(Clone, Debug)]
pub struct RegisterUserCmd {
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub email: String,
}

impl RegisterUserCmd {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        nickname: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            nickname: nickname.into(),
            email: email.into(),
        }
    }
}

/// Set the personal bank account of a user.
#[derive(Clone, Debug)]
pub struct AccountCmd {
    pub bank: String,
    pub number: String,
    pub balance: i64,
}

impl AccountCmd {
    #[must_use]
    pub fn new(bank: impl Into<String>, number: impl Into<String>, balance: i64) -> Self {
        Self {
            bank: bank.into(),
            number: number.into(),
            balance,
        }
    }
}

/// Create a group.
///
/// `today` is the caller's calendar day, used to reject groups starting in
/// the past.
#[derive(Clone, Debug)]
pub struct CreateGroupCmd {
    pub name: String,
    pub description: String,
    pub creator: String,
    /// Nicknames of participants other than the creator.
    pub participants: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_budget: i64,
    pub today: NaiveDate,
}

impl CreateGroupCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        creator: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        due_date: NaiveDate,
        total_budget: i64,
        today: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            creator: creator.into(),
            participants: Vec::new(),
            start_date,
            end_date,
            due_date,
            total_budget,
            today,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn participant(mut self, nickname: impl Into<String>) -> Self {
        self.participants.push(nickname.into());
        self
    }

    #[must_use]
    pub fn participants<I, S>(mut self, nicknames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants
            .extend(nicknames.into_iter().map(Into::into));
        self
    }
}

/// Update the editable fields of a group. `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct UpdateGroupCmd {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub total_budget: Option<i64>,
}

impl UpdateGroupCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn dates(mut self, start_date: NaiveDate, end_date: NaiveDate, due_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn total_budget(mut self, total_budget: i64) -> Self {
        self.total_budget = Some(total_budget);
        self
    }
}

/// Move money from the user's bank account into a group.
#[derive(Clone, Debug)]
pub struct DepositCmd {
    pub group_id: Uuid,
    pub user_id: String,
    pub amount: i64,
    /// Retries carrying the same key return the first deposit's id.
    pub idempotency_key: Option<String>,
}

impl DepositCmd {
    #[must_use]
    pub fn new(group_id: Uuid, user_id: impl Into<String>, amount: i64) -> Self {
        Self {
            group_id,
            user_id: user_id.into(),
            amount,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Register an expense paid from the group balance.
#[derive(Clone, Debug)]
pub struct AddExpenseCmd {
    pub group_id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub amount: i64,
    pub category: String,
    pub memo: Option<String>,
}

impl AddExpenseCmd {
    #[must_use]
    pub fn new(
        group_id: Uuid,
        user_id: impl Into<String>,
        date: NaiveDate,
        amount: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            group_id,
            user_id: user_id.into(),
            date,
            amount,
            category: category.into(),
            memo: None,
        }
    }

    #[must_use]
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// Update an expense. `None` keeps the stored value; an empty memo clears it.
#[derive(Clone, Debug, Default)]
pub struct UpdateExpenseCmd {
    pub date: Option<NaiveDate>,
    pub amount: Option<i64>,
    pub category: Option<String>,
    pub memo: Option<String>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}
