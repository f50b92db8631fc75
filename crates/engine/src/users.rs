//! Users: login credentials, profile, PIN and personal bank account.
//!
//! The engine identifies users by `username`, which is also the login id.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Personal bank account deposits are drawn from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub bank: String,
    pub number: String,
    pub balance: i64,
}

/// Public view of a user. Credentials never leave the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub account: Option<Account>,
    pub has_pin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub pin_hash: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_balance: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn account(&self) -> Option<Account> {
        match (&self.bank_name, &self.account_number, self.account_balance) {
            (Some(bank), Some(number), Some(balance)) => Some(Account {
                bank: bank.clone(),
                number: number.clone(),
                balance,
            }),
            _ => None,
        }
    }
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        let account = model.account();
        Self {
            username: model.username,
            nickname: model.nickname,
            email: model.email,
            account,
            has_pin: model.pin_hash.is_some(),
            created_at: model.created_at,
        }
    }
}
