use std::sync::Arc;

use tracing::info;

use super::{entity::StudyPost, repo::StudyPostRepository};
use crate::error::{FieldErrors, RestErr, RestResult};

#[derive(Clone)]
pub struct StudyPostApp {
    repo: Arc<dyn StudyPostRepository>,
}

impl StudyPostApp {
    pub fn new(repo: Arc<dyn StudyPostRepository>) -> Self {
        Self { repo }
    }

    pub async fn save_post(&self, mut post: StudyPost) -> RestResult<StudyPost> {
        post.validate()?;
        self.repo.save_post(&mut post).await?;
        info!(post_id = post.id, user_id = post.user_id, "study post created");
        Ok(post)
    }

    pub async fn get_post(&self, post_id: i64) -> RestResult<StudyPost> {
        self.repo.get_post(post_id).await
    }

    pub async fn get_posts_in_latest_order(
        &self,
        limit: i64,
        offset: i64,
    ) -> RestResult<Vec<StudyPost>> {
        self.repo.get_posts_in_latest_order(limit, offset).await
    }

    pub async fn get_posts_by_user_id(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> RestResult<Vec<StudyPost>> {
        self.repo.get_posts_by_user_id(user_id, limit, offset).await
    }

    /// The owner is fixed at creation; a body naming another `user_id` is rejected.
    pub async fn update_post(&self, post: StudyPost) -> RestResult<StudyPost> {
        post.validate()?;
        let current = self.repo.get_post(post.id).await?;
        if current.user_id != post.user_id {
            let mut fields = FieldErrors::new();
            fields.insert(
                "user_id".into(),
                format!("study post {} belongs to user {}", post.id, current.user_id),
            );
            return Err(RestErr::validation("owner cannot be changed", fields));
        }
        let updated = self.repo.update_post(&post).await?;
        info!(post_id = updated.id, "study post updated");
        Ok(updated)
    }

    pub async fn delete_post(&self, post_id: i64) -> RestResult<()> {
        self.repo.delete_post(post_id).await?;
        info!(post_id, "study post deleted");
        Ok(())
    }
}
