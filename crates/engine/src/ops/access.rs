use sea_orm::{ActiveValue, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, users};

use super::Engine;

/// Proof of authentication.
///
/// A `Principal` can only be obtained through [`Engine::authenticate`];
/// every mutating operation requires a reference to one, so the engine
/// refuses writes from unauthenticated callers by construction.
#[derive(Clone, Debug)]
pub struct Principal {
    username: String,
}

impl Principal {
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Engine {
    /// Resolves credentials against the users table.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Principal> {
        if username.is_empty() || password.is_empty() {
            return Err(EngineError::Unauthorized);
        }

        let user = users::Entity::find_by_id(username.to_string())
            .filter(users::Column::Password.eq(password.to_string()))
            .one(&self.database)
            .await
            .map_err(EngineError::StoreUnavailable)?;

        match user {
            Some(user) => Ok(Principal {
                username: user.username,
            }),
            None => Err(EngineError::Unauthorized),
        }
    }

    /// Creates the user if missing. Idempotent; used at startup to seed
    /// credentials from the settings file.
    pub async fn ensure_user(&self, username: &str, password: &str) -> ResultEngine<()> {
        if username.is_empty() || password.is_empty() {
            return Err(EngineError::Validation(
                "username and password must not be empty".to_string(),
            ));
        }

        let existing = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await
            .map_err(EngineError::StoreUnavailable)?;
        if existing.is_some() {
            return Ok(());
        }

        let user = users::ActiveModel {
            username: ActiveValue::Set(username.to_string()),
            password: ActiveValue::Set(password.to_string()),
        };
        user.insert(&self.database)
            .await
            .map_err(EngineError::StoreWriteFailed)?;

        tracing::info!(user = username, "user created");
        Ok(())
    }
}
