use async_trait::async_trait;
use axum_login::AuthnBackend;
use derive_masked::DebugMasked;
use diesel::OptionalExtension;
use diesel_async::pooled_connection::deadpool::Pool;
use password_auth::verify_password;
use serde::Deserialize;
use validator::Validate;

use crate::model::UserRecord;
use crate::Connection;

pub type AuthSession = axum_login::AuthSession<Auth>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Pool(#[from] deadpool::managed::PoolError<diesel_async::pooled_connection::PoolError>),

    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),

    #[error(transparent)]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[derive(Clone, Deserialize, DebugMasked)]
pub struct Credentials {
    pub username: String,
    #[masked]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Validate, Deserialize, DebugMasked, Clone, Default)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[masked]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub next: Option<String>,
}

#[derive(Validate, Deserialize, DebugMasked, Clone, Default)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Your name cannot be empty"))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 32,
        message = "Username must be between 1 and 32 characters"
    ))]
    pub username: String,

    #[masked]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Clone)]
pub struct Auth {
    pub database: Pool<Connection>,
}

impl Auth {
    pub fn new(database: Pool<Connection>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl AuthnBackend for Auth {
    type User = UserRecord;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(
        &self,
        credentials: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let mut conn = self.database.get().await?;
        let Some(user) = UserRecord::find_by_username(&credentials.username, &mut conn).await?
        else {
            return Ok(None);
        };

        // Argon2 verification is CPU-bound; keep it off the async worker.
        tokio::task::spawn_blocking(move || {
            Ok(verify_password(&credentials.password, &user.password)
                .is_ok()
                .then_some(user))
        })
        .await?
    }

    async fn get_user(
        &self,
        user_id: &axum_login::UserId<Self>,
    ) -> Result<Option<Self::User>, Self::Error> {
        let mut conn = self.database.get().await?;
        Ok(UserRecord::read(*user_id, &mut conn).await.optional()?)
    }
}
