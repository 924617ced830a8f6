use async_trait::async_trait;
use sqlx::PgPool;

use super::entity::User;
use crate::{
    auth::password::verify_password,
    error::{db_error, RestErr, RestResult},
};

pub const EMAIL_MISMATCH: &str = "email does not match";
pub const PASSWORD_MISMATCH: &str = "password does not match";

/// Result of an existence probe on a unique column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Exists,
    Free,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and fills in its generated id.
    async fn save(&self, user: &mut User) -> RestResult<()>;
    async fn get_by_id(&self, id: i64) -> RestResult<User>;
    async fn get_all(&self, limit: i64, offset: i64) -> RestResult<Vec<User>>;
    async fn update(&self, user: &User) -> RestResult<User>;
    async fn delete(&self, id: i64) -> RestResult<()>;
    async fn find_by_email(&self, email: &str) -> RestResult<Presence>;
    async fn find_by_nickname(&self, nickname: &str) -> RestResult<Presence>;
    /// Fails with [`EMAIL_MISMATCH`] or [`PASSWORD_MISMATCH`] when credentials do not line up.
    async fn find_by_email_and_password(&self, email: &str, password: &str) -> RestResult<User>;
}

/// Checks a plaintext password against a stored user, classifying the outcome.
pub(crate) fn match_password(user: User, password: &str) -> RestResult<User> {
    if verify_password(password, &user.password)? {
        Ok(user)
    } else {
        Err(RestErr::bad_request(PASSWORD_MISMATCH))
    }
}

fn classify_insert_error(e: sqlx::Error) -> RestErr {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some(c) if c.contains("nickname") => RestErr::duplicate("duplicated nickname"),
                _ => RestErr::duplicate("duplicated email"),
            };
        }
    }
    db_error("error when trying to save user")(e)
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn save(&self, user: &mut User) -> RestResult<()> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, nickname, password, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.nickname)
        .bind(&user.password)
        .bind(&user.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(classify_insert_error)?;
        user.id = id;
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> RestResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, nickname, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("error when trying to get user"))?
        .ok_or_else(|| RestErr::bad_request(format!("user {id} doesn't exist")))
    }

    async fn get_all(&self, limit: i64, offset: i64) -> RestResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, nickname, password, created_at, updated_at
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("error when trying to get users"))
    }

    async fn update(&self, user: &User) -> RestResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $1, nickname = $2, password = $3, updated_at = $4
            WHERE id = $5
            RETURNING id, email, nickname, password, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.nickname)
        .bind(&user.password)
        .bind(&user.updated_at)
        .bind(user.id)
        .fetch_optional(&self.db)
        .await
        .map_err(classify_insert_error)?
        .ok_or_else(|| RestErr::bad_request(format!("user {} doesn't exist", user.id)))
    }

    async fn delete(&self, id: i64) -> RestResult<()> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(db_error("error when trying to delete user"))?;
        if res.rows_affected() == 0 {
            return Err(RestErr::bad_request("no rows to be deleted"));
        }
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> RestResult<Presence> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(db_error("error when trying to find email"))?;
        Ok(if found.is_some() { Presence::Exists } else { Presence::Free })
    }

    async fn find_by_nickname(&self, nickname: &str) -> RestResult<Presence> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE nickname = $1")
            .bind(nickname)
            .fetch_optional(&self.db)
            .await
            .map_err(db_error("error when trying to find nickname"))?;
        Ok(if found.is_some() { Presence::Exists } else { Presence::Free })
    }

    async fn find_by_email_and_password(&self, email: &str, password: &str) -> RestResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, nickname, password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("error when trying to find user"))?
        .ok_or_else(|| RestErr::bad_request(EMAIL_MISMATCH))?;
        match_password(user, password)
    }
}
