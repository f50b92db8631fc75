//! Group participants.
//!
//! A participant is a nickname slot inside a group. The owner creates the
//! slots; a registered user claims one through the invite link, which links
//! the slot to their account.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: Uuid,
    pub group_id: Uuid,
    pub nickname: String,
    /// Linked account, `None` while the slot is unclaimed.
    pub user_id: Option<String>,
    pub is_owner: bool,
}

impl Participant {
    pub fn is_linked(&self) -> bool {
        self.user_id.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub nickname: String,
    pub user_id: Option<String>,
    pub is_owner: bool,
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

impl TryFrom<Model> for Participant {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "participant")?,
            group_id: parse_uuid(&model.group_id, "group")?,
            nickname: model.nickname,
            user_id: model.user_id,
            is_owner: model.is_owner,
        })
    }
}

/// Owner first, then by nickname.
pub(crate) fn sort_participants(participants: &mut [Participant]) {
    participants.sort_by(|a, b| {
        b.is_owner
            .cmp(&a.is_owner)
            .then_with(|| a.nickname.cmp(&b.nickname))
    });
}
