use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, credentials, users};

use super::{Engine, with_tx};

impl Engine {
    /// Register or replace the 6-digit PIN of a user.
    ///
    /// Whether replacing requires a prior PIN check is up to the caller.
    pub async fn register_pin(&self, username: &str, pin: &str) -> ResultEngine<()> {
        credentials::validate_pin(pin)?;
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, username).await?;
            let pin_hash = credentials::hash_pin(&model.password_salt, pin)?;
            users::ActiveModel {
                username: ActiveValue::Set(model.username),
                pin_hash: ActiveValue::Set(Some(pin_hash)),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    pub async fn verify_pin(&self, username: &str, pin: &str) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, username).await?;
            let pin_hash = model
                .pin_hash
                .ok_or_else(|| EngineError::KeyNotFound("pin not registered".to_string()))?;
            credentials::verify_pin(&model.password_salt, pin, &pin_hash)
        })
    }

    pub async fn has_pin(&self, username: &str) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, username).await?;
            Ok(model.pin_hash.is_some())
        })
    }
}
