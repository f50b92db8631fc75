use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Account, AccountCmd, EngineError, RegisterUserCmd, ResultEngine, User, credentials,
    notifications, participants, users,
    util::{normalize_required, require_at_most_max},
    wallets, withdrawn_users,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create an account. Returns the username.
    pub async fn register_user(&self, cmd: RegisterUserCmd) -> ResultEngine<String> {
        let username = normalize_required(&cmd.username, "username")?;
        credentials::validate_password(&cmd.password)?;
        let nickname = normalize_required(&cmd.nickname, "nickname")?;
        let email = cmd.email.trim().to_string();

        with_tx!(self, |db_tx| {
            let taken = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some();
            let withdrawn = withdrawn_users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if taken || withdrawn {
                return Err(EngineError::ExistingKey(username));
            }

            let salt = credentials::new_salt();
            users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                nickname: ActiveValue::Set(nickname),
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(credentials::hash_password(&salt, &cmd.password)),
                password_salt: ActiveValue::Set(salt),
                pin_hash: ActiveValue::Set(None),
                bank_name: ActiveValue::Set(None),
                account_number: ActiveValue::Set(None),
                account_balance: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            Ok(username)
        })
    }

    /// Check a username/password pair.
    ///
    /// Unknown users and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;
        match model {
            Some(model)
                if credentials::verify_password(
                    &model.password_salt,
                    password,
                    &model.password_hash,
                ) =>
            {
                Ok(User::from(model))
            }
            _ => Err(EngineError::Unauthorized(
                "invalid username or password".to_string(),
            )),
        }
    }

    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, username).await?;
            Ok(User::from(model))
        })
    }

    pub async fn change_nickname(&self, username: &str, nickname: &str) -> ResultEngine<()> {
        let nickname = normalize_required(nickname, "nickname")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, username).await?;
            users::ActiveModel {
                username: ActiveValue::Set(username.to_string()),
                nickname: ActiveValue::Set(nickname),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Replace the password after checking the current one.
    pub async fn change_password(
        &self,
        username: &str,
        current: &str,
        new_password: &str,
    ) -> ResultEngine<()> {
        credentials::validate_password(new_password)?;
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, username).await?;
            if !credentials::verify_password(&model.password_salt, current, &model.password_hash)
            {
                return Err(EngineError::Unauthorized(
                    "current password does not match".to_string(),
                ));
            }
            users::ActiveModel {
                username: ActiveValue::Set(model.username),
                password_hash: ActiveValue::Set(credentials::hash_password(
                    &model.password_salt,
                    new_password,
                )),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Register or replace the personal bank account deposits are drawn from.
    pub async fn set_account(&self, username: &str, cmd: AccountCmd) -> ResultEngine<()> {
        let bank = normalize_required(&cmd.bank, "bank")?;
        let number = normalize_required(&cmd.number, "account number")?;
        if cmd.balance < 0 {
            return Err(EngineError::InvalidAmount(
                "account balance must be >= 0".to_string(),
            ));
        }
        require_at_most_max(cmd.balance, "account balance")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, username).await?;
            users::ActiveModel {
                username: ActiveValue::Set(username.to_string()),
                bank_name: ActiveValue::Set(Some(bank)),
                account_number: ActiveValue::Set(Some(number)),
                account_balance: ActiveValue::Set(Some(cmd.balance)),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    pub async fn account(&self, username: &str) -> ResultEngine<Option<Account>> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, username).await?;
            Ok(model.account())
        })
    }

    /// Delete an account.
    ///
    /// Notifications and wallets go with it; participant slots are unlinked
    /// and stay in their groups. Groups the user created are kept, and the
    /// username is reserved so nobody can register it and take them over.
    pub async fn withdraw_user(&self, username: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, username).await?;

            notifications::Entity::delete_many()
                .filter(notifications::Column::UserId.eq(username.to_string()))
                .exec(&db_tx)
                .await?;
            wallets::Entity::delete_many()
                .filter(wallets::Column::UserId.eq(username.to_string()))
                .exec(&db_tx)
                .await?;
            participants::Entity::update_many()
                .set(participants::ActiveModel {
                    user_id: ActiveValue::Set(None),
                    ..Default::default()
                })
                .filter(participants::Column::UserId.eq(username.to_string()))
                .exec(&db_tx)
                .await?;
            users::Entity::delete_by_id(username.to_string())
                .exec(&db_tx)
                .await?;
            withdrawn_users::ActiveModel {
                username: ActiveValue::Set(username.to_string()),
                withdrawn_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(username, "user withdrawn");
            Ok(())
        })
    }
}
