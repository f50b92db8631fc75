//! Group notices (announcements).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// Shown in place of the author of a notice whose account was withdrawn.
pub(crate) const WITHDRAWN_AUTHOR: &str = "탈퇴한 사용자";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    /// Current nickname of the author.
    pub author_nickname: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub content: String,
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

impl Notice {
    pub(crate) fn from_model(model: Model, author_nickname: Option<String>) -> Result<Self, EngineError> {
        Ok(Self {
            id: parse_uuid(&model.id, "notice")?,
            group_id: parse_uuid(&model.group_id, "group")?,
            title: model.title,
            content: model.content,
            author: model.author,
            author_nickname: author_nickname.unwrap_or_else(|| WITHDRAWN_AUTHOR.to_string()),
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdrawn_author_gets_placeholder() {
        let model = Model {
            id: Uuid::new_v4().to_string(),
            group_id: Uuid::new_v4().to_string(),
            title: "공지".to_string(),
            content: "내일 9시 출발".to_string(),
            author: "ghost".to_string(),
            created_at: Utc::now(),
        };
        let notice = Notice::from_model(model, None).unwrap();
        assert_eq!(notice.author_nickname, WITHDRAWN_AUTHOR);
    }
}
