//! In-app notifications.
//!
//! Notifications are written inside the transaction of the operation that
//! triggers them, one row per linked member of the group.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Announcement,
    Expense,
    Deposit,
    Join,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::Expense => "expense",
            Self::Deposit => "deposit",
            Self::Join => "join",
        }
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "announcement" => Ok(Self::Announcement),
            "expense" => Ok(Self::Expense),
            "deposit" => Ok(Self::Deposit),
            "join" => Ok(Self::Join),
            other => Err(EngineError::InvalidInput(format!(
                "invalid notification kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub kind: NotificationKind,
    pub group_id: Uuid,
    /// Group name at the time of the event; the group may be gone since.
    pub group_name: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub group_id: String,
    pub group_name: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Notification {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "notification")?,
            user_id: model.user_id,
            kind: NotificationKind::try_from(model.kind.as_str())?,
            group_id: parse_uuid(&model.group_id, "group")?,
            group_name: model.group_name,
            message: model.message,
            read: model.read,
            created_at: model.created_at,
        })
    }
}
