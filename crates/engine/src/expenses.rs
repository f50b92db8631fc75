//! The module contains `Expense` struct and its implementation.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// Categories offered by clients when registering an expense. Any other
/// non-empty category is accepted too.
pub const DEFAULT_CATEGORIES: [&str; 6] = ["식비", "교통비", "숙박비", "관광", "쇼핑", "기타"];

/// An expense paid from a group's pooled balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: Uuid,
    /// Day the money was spent.
    pub date: NaiveDate,
    pub amount: i64,
    pub category: String,
    pub memo: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub date: Date,
    pub amount: i64,
    pub category: String,
    pub memo: Option<String>,
    pub author: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            group_id: parse_uuid(&model.group_id, "group")?,
            date: model.date,
            amount: model.amount,
            category: model.category,
            memo: model.memo,
            author: model.author,
            created_at: model.created_at,
        })
    }
}
