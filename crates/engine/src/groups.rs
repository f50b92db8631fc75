//! The module contains `Group` struct and its implementation.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

/// A group ("moim"): a shared budget pooled by its participants over a date
/// range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Deposit deadline.
    pub due_date: NaiveDate,
    pub total_budget: i64,
    /// Pooled balance: deposits minus expenses.
    pub balance: i64,
    pub participant_count: i32,
}

impl Group {
    pub fn status(&self, today: NaiveDate) -> GroupStatus {
        GroupStatus::of(self.start_date, self.end_date, today)
    }

    /// Even share of the budget per participant, rounded down.
    pub fn fee_per_person(&self) -> i64 {
        if self.participant_count <= 0 {
            return 0;
        }
        self.total_budget / i64::from(self.participant_count)
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.creator_id == user_id
    }
}

/// Lifecycle of a group relative to a calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupStatus {
    /// Before the start date: participants are still being gathered.
    Recruiting,
    InProgress,
    Finished,
}

impl GroupStatus {
    pub fn of(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if today < start {
            Self::Recruiting
        } else if today <= end {
            Self::InProgress
        } else {
            Self::Finished
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Self::Finished)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recruiting => "recruiting",
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
        }
    }

    fn priority(self) -> u8 {
        match self {
            Self::InProgress => 0,
            Self::Recruiting => 1,
            Self::Finished => 2,
        }
    }
}

/// Pick the group a dashboard should feature.
///
/// Running groups come first, then recruiting ones, then finished ones.
/// Within a status the most recent group wins: by start date for running and
/// recruiting groups, by end date for finished ones.
pub fn top_priority_group(groups: &[Group], today: NaiveDate) -> Option<&Group> {
    groups.iter().min_by(|a, b| {
        let (status_a, status_b) = (a.status(today), b.status(today));
        status_a
            .priority()
            .cmp(&status_b.priority())
            .then_with(|| sort_date(b, status_b).cmp(&sort_date(a, status_a)))
    })
}

fn sort_date(group: &Group, status: GroupStatus) -> NaiveDate {
    match status {
        GroupStatus::Finished => group.end_date,
        GroupStatus::Recruiting | GroupStatus::InProgress => group.start_date,
    }
}

/// Date rules shared by creation and update: the deposit deadline falls
/// before the start, and the group ends after it starts.
pub(crate) fn validate_schedule(
    start_date: NaiveDate,
    end_date: NaiveDate,
    due_date: NaiveDate,
) -> ResultEngine<()> {
    if end_date.cmp(&start_date) != Ordering::Greater {
        return Err(EngineError::InvalidGroup(
            "end date must be after the start date".to_string(),
        ));
    }
    if due_date >= start_date {
        return Err(EngineError::InvalidGroup(
            "deposit deadline must be before the start date".to_string(),
        ));
    }
    if due_date > end_date {
        return Err(EngineError::InvalidGroup(
            "deposit deadline must be before the end date".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub creator_id: String,
    pub created_at: DateTimeUtc,
    pub start_date: Date,
    pub end_date: Date,
    pub due_date: Date,
    pub total_budget: i64,
    pub balance: i64,
    pub participant_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Group {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "group")?,
            name: model.name,
            description: model.description,
            creator_id: model.creator_id,
            created_at: model.created_at,
            start_date: model.start_date,
            end_date: model.end_date,
            due_date: model.due_date,
            total_budget: model.total_budget,
            balance: model.balance,
            participant_count: model.participant_count,
        })
    }
}
