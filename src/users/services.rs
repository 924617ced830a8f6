use std::sync::Arc;

use tracing::{error, info, warn};

use super::{
    dto::LoginResponse,
    entity::User,
    repo::{Presence, UserRepository, EMAIL_MISMATCH, PASSWORD_MISMATCH},
};
use crate::{
    auth::{jwt::TokenService, password::hash_password},
    error::{RestErr, RestResult},
    helpers::now_string,
};

const WRONG_CREDENTIALS: &str = "wrong email or password";

/// User use cases on top of a [`UserRepository`] and a [`TokenService`].
#[derive(Clone)]
pub struct UserApp {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
}

impl UserApp {
    pub fn new(repo: Arc<dyn UserRepository>, tokens: Arc<dyn TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn save_user(&self, mut user: User) -> RestResult<User> {
        user.normalize();
        user.validate()?;
        user.before_save()?;
        self.repo.save(&mut user).await?;
        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> RestResult<User> {
        self.repo.get_by_id(user_id).await
    }

    pub async fn get_all_users(&self, limit: i64, offset: i64) -> RestResult<Vec<User>> {
        self.repo.get_all(limit, offset).await
    }

    /// Re-hashes whatever password the caller supplied; there is no "unchanged" detection.
    pub async fn update_user(&self, mut user: User) -> RestResult<User> {
        user.normalize();
        user.updated_at = Some(now_string());
        user.password = hash_password(&user.password)?;
        let updated = self.repo.update(&user).await?;
        info!(user_id = updated.id, "user updated");
        Ok(updated)
    }

    pub async fn delete_user(&self, user_id: i64) -> RestResult<()> {
        self.repo.delete(user_id).await?;
        info!(user_id, "user deleted");
        Ok(())
    }

    pub async fn find_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> RestResult<User> {
        let email = email.trim().to_lowercase();
        match self.repo.find_by_email_and_password(&email, password).await {
            Ok(user) => Ok(user),
            Err(e) if matches!(e.message(), EMAIL_MISMATCH | PASSWORD_MISMATCH) => {
                warn!(email = %email, reason = e.message(), "login rejected");
                Err(RestErr::wrong_credentials(WRONG_CREDENTIALS))
            }
            Err(e) => Err(e),
        }
    }

    pub fn login_user(&self, user: User) -> RestResult<LoginResponse> {
        let pair = self.tokens.generate_token_pair(user.id).map_err(|e| {
            error!(error = %e, user_id = user.id, "token generation failed");
            RestErr::internal("token generation error")
        })?;
        info!(user_id = user.id, "user logged in");
        Ok(LoginResponse {
            user,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Trades a valid refresh token for a fresh pair.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> RestResult<LoginResponse> {
        let user_id = self.tokens.verify_refresh(refresh_token).map_err(|e| {
            warn!(error = %e, "refresh token rejected");
            RestErr::wrong_credentials("invalid or expired refresh token")
        })?;
        let user = self.repo.get_by_id(user_id).await.map_err(|e| match e {
            RestErr::BadRequest(_) => RestErr::wrong_credentials("user not found"),
            other => other,
        })?;
        self.login_user(user)
    }

    pub async fn check_duplicated_email(&self, email: &str) -> RestResult<()> {
        let email = email.trim().to_lowercase();
        match self.repo.find_by_email(&email).await? {
            Presence::Exists => Err(RestErr::duplicate("duplicated email")),
            Presence::Free => Ok(()),
        }
    }

    pub async fn check_duplicated_nickname(&self, nickname: &str) -> RestResult<()> {
        match self.repo.find_by_nickname(nickname.trim()).await? {
            Presence::Exists => Err(RestErr::duplicate("duplicated nickname")),
            Presence::Free => Ok(()),
        }
    }
}
