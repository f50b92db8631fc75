use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{Notice, Participant, ResultEngine};

mod access;
mod expenses;
mod groups;
mod notices;
mod notifications;
mod participants;
mod pin;
mod statistics;
mod users;
mod wallets;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// A member group whose deposit deadline is close and which the user has
/// not paid into yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositReminder {
    pub group_id: Uuid,
    pub group_name: String,
    pub due_date: NaiveDate,
    /// Days left until the deadline, `0` on the day itself.
    pub days_left: i64,
    pub fee_per_person: i64,
}

/// What the invite page shows before a user claims a slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinPreview {
    pub group_id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_budget: i64,
    pub participants: Vec<Participant>,
}

/// Newest notice of one group, for the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatestNotice {
    pub group_name: String,
    pub notice: Notice,
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
