use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use super::{
    entity::StudyPost,
    repo::{rollback_failure, StudyPostRepository},
};
use crate::error::{RestErr, RestResult};

/// In-memory study_post table. Updates run against a staged copy that is
/// only swapped in once the read-back succeeds, mirroring the SQL transaction.
#[derive(Default)]
pub struct InMemoryStudyPostRepository {
    inner: Mutex<Inner>,
    fail_next_read_back: AtomicBool,
    fail_next_rollback: AtomicBool,
}

#[derive(Default, Clone)]
struct Inner {
    next_id: i64,
    clock: Option<OffsetDateTime>,
    rows: BTreeMap<i64, StudyPost>,
}

impl Inner {
    // Strictly increasing timestamps keep "latest first" deterministic.
    fn tick(&mut self) -> OffsetDateTime {
        let now = match self.clock {
            Some(prev) => prev + Duration::seconds(1),
            None => OffsetDateTime::now_utc(),
        };
        self.clock = Some(now);
        now
    }

    fn page<'a>(
        posts: impl Iterator<Item = &'a StudyPost>,
        limit: i64,
        offset: i64,
    ) -> Vec<StudyPost> {
        let mut posts: Vec<StudyPost> = posts.cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }
}

impl InMemoryStudyPostRepository {
    /// Makes the next update fail after its UPDATE statement, as a bad row decode would.
    pub fn fail_next_read_back(&self) {
        self.fail_next_read_back.store(true, Ordering::SeqCst);
    }

    /// Makes the rollback following a failed read-back fail as well.
    pub fn fail_next_rollback(&self) {
        self.fail_next_rollback.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("study post store poisoned")
    }
}

#[async_trait]
impl StudyPostRepository for InMemoryStudyPostRepository {
    async fn save_post(&self, post: &mut StudyPost) -> RestResult<()> {
        let mut inner = self.lock();
        let now = inner.tick();
        inner.next_id += 1;
        post.id = inner.next_id;
        post.created_at = Some(now);
        post.updated_at = Some(now);
        inner.rows.insert(post.id, post.clone());
        Ok(())
    }

    async fn get_post(&self, id: i64) -> RestResult<StudyPost> {
        self.lock()
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| RestErr::bad_request(format!("study post {id} doesn't exist")))
    }

    async fn get_posts_in_latest_order(
        &self,
        limit: i64,
        offset: i64,
    ) -> RestResult<Vec<StudyPost>> {
        let inner = self.lock();
        Ok(Inner::page(inner.rows.values(), limit, offset))
    }

    async fn get_posts_by_user_id(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> RestResult<Vec<StudyPost>> {
        let inner = self.lock();
        let owned = inner.rows.values().filter(|p| p.user_id == user_id);
        Ok(Inner::page(owned, limit, offset))
    }

    async fn update_post(&self, post: &StudyPost) -> RestResult<StudyPost> {
        let mut inner = self.lock();
        let mut staged = inner.clone();
        let now = staged.tick();

        let row = staged
            .rows
            .get_mut(&post.id)
            .ok_or_else(|| RestErr::bad_request(format!("study post {} doesn't exist", post.id)))?;
        row.title = post.title.clone();
        row.topic = post.topic.clone();
        row.content = post.content.clone();
        row.num_of_members = post.num_of_members;
        row.is_mentor = post.is_mentor;
        row.price = post.price;
        row.start_date = post.start_date;
        row.end_date = post.end_date;
        row.is_online = post.is_online;
        row.tech_stack = post.tech_stack.clone();
        row.updated_at = Some(now);
        let updated = row.clone();

        if self.fail_next_read_back.swap(false, Ordering::SeqCst) {
            // staged copy is dropped: the rollback
            let rollback = self
                .fail_next_rollback
                .swap(false, Ordering::SeqCst)
                .then(|| "connection closed".to_string());
            return Err(rollback_failure("row scan error", rollback));
        }

        *inner = staged;
        Ok(updated)
    }

    async fn delete_post(&self, id: i64) -> RestResult<()> {
        match self.lock().rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RestErr::bad_request("no rows to be deleted")),
        }
    }
}
