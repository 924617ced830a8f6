use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::error;

use super::entity::StudyPost;
use crate::error::{db_error, RestErr, RestResult};

#[async_trait]
pub trait StudyPostRepository: Send + Sync {
    /// Inserts the post; fills in `id`, `created_at` and `updated_at`.
    async fn save_post(&self, post: &mut StudyPost) -> RestResult<()>;
    async fn get_post(&self, id: i64) -> RestResult<StudyPost>;
    async fn get_posts_in_latest_order(
        &self,
        limit: i64,
        offset: i64,
    ) -> RestResult<Vec<StudyPost>>;
    async fn get_posts_by_user_id(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> RestResult<Vec<StudyPost>>;
    /// Replaces every editable field inside one transaction.
    async fn update_post(&self, post: &StudyPost) -> RestResult<StudyPost>;
    async fn delete_post(&self, id: i64) -> RestResult<()>;
}

/// Builds the error for a failed read-back, folding in a failed rollback if there was one.
pub(crate) fn rollback_failure(cause: &str, rollback: Option<String>) -> RestErr {
    match rollback {
        Some(rb) => {
            error!(error = %rb, cause, "rollback failed");
            RestErr::internal(format!("rollback error: {rb} (while handling: {cause})"))
        }
        None => RestErr::internal(format!("database update error: {cause}")),
    }
}

#[derive(Clone)]
pub struct PgStudyPostRepository {
    db: PgPool,
}

impl PgStudyPostRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, user_id, title, topic, content, num_of_members, is_mentor, price, \
                       start_date, end_date, is_online, tech_stack, created_at, updated_at";

#[async_trait]
impl StudyPostRepository for PgStudyPostRepository {
    async fn save_post(&self, post: &mut StudyPost) -> RestResult<()> {
        let now = OffsetDateTime::now_utc();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO study_post (user_id, title, topic, content, num_of_members, is_mentor,
                                    price, start_date, end_date, is_online, tech_stack,
                                    created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.topic)
        .bind(&post.content)
        .bind(post.num_of_members)
        .bind(post.is_mentor)
        .bind(post.price)
        .bind(post.start_date)
        .bind(post.end_date)
        .bind(post.is_online)
        .bind(&post.tech_stack)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(db_error("error when trying to save study post"))?;

        post.id = id;
        post.created_at = Some(now);
        post.updated_at = Some(now);
        Ok(())
    }

    async fn get_post(&self, id: i64) -> RestResult<StudyPost> {
        sqlx::query_as::<_, StudyPost>(&format!(
            "SELECT {COLUMNS} FROM study_post WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("error when trying to get study post"))?
        .ok_or_else(|| RestErr::bad_request(format!("study post {id} doesn't exist")))
    }

    async fn get_posts_in_latest_order(
        &self,
        limit: i64,
        offset: i64,
    ) -> RestResult<Vec<StudyPost>> {
        sqlx::query_as::<_, StudyPost>(&format!(
            "SELECT {COLUMNS} FROM study_post ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("error when trying to get study posts"))
    }

    async fn get_posts_by_user_id(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> RestResult<Vec<StudyPost>> {
        sqlx::query_as::<_, StudyPost>(&format!(
            "SELECT {COLUMNS} FROM study_post WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("error when trying to get study posts of user"))
    }

    async fn update_post(&self, post: &StudyPost) -> RestResult<StudyPost> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(db_error("error when trying to begin transaction"))?;

        let row = sqlx::query_as::<_, StudyPost>(&format!(
            r#"
            UPDATE study_post
            SET title = $1, topic = $2, content = $3, num_of_members = $4, is_mentor = $5,
                price = $6, start_date = $7, end_date = $8, is_online = $9, tech_stack = $10,
                updated_at = $11
            WHERE id = $12
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&post.title)
        .bind(&post.topic)
        .bind(&post.content)
        .bind(post.num_of_members)
        .bind(post.is_mentor)
        .bind(post.price)
        .bind(post.start_date)
        .bind(post.end_date)
        .bind(post.is_online)
        .bind(&post.tech_stack)
        .bind(OffsetDateTime::now_utc())
        .bind(post.id)
        .fetch_optional(&mut *tx)
        .await;

        let updated = match row {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                let rollback = tx.rollback().await.err().map(|e| e.to_string());
                if let Some(rb) = rollback {
                    return Err(rollback_failure("row doesn't exist", Some(rb)));
                }
                return Err(RestErr::bad_request(format!(
                    "study post {} doesn't exist",
                    post.id
                )));
            }
            Err(e) => {
                error!(error = %e, post_id = post.id, "study post update failed, rolling back");
                let rollback = tx.rollback().await.err().map(|e| e.to_string());
                return Err(rollback_failure(&e.to_string(), rollback));
            }
        };

        tx.commit()
            .await
            .map_err(db_error("error when trying to commit study post update"))?;
        Ok(updated)
    }

    async fn delete_post(&self, id: i64) -> RestResult<()> {
        let res = sqlx::query("DELETE FROM study_post WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(db_error("error when trying to delete study post"))?;
        if res.rows_affected() == 0 {
            return Err(RestErr::bad_request("no rows to be deleted"));
        }
        Ok(())
    }
}
