use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;

use super::{
    entity::User,
    repo::{match_password, Presence, UserRepository, EMAIL_MISMATCH},
};
use crate::error::{RestErr, RestResult};

/// In-memory stand-in for the users table, including its unique constraints.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, User>,
}

impl Inner {
    fn conflict(&self, user: &User) -> Option<RestErr> {
        let others = self.rows.values().filter(|u| u.id != user.id);
        for other in others {
            if other.email == user.email {
                return Some(RestErr::duplicate("duplicated email"));
            }
            if other.nickname == user.nickname {
                return Some(RestErr::duplicate("duplicated nickname"));
            }
        }
        None
    }
}

impl InMemoryUserRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("user store poisoned")
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &mut User) -> RestResult<()> {
        let mut inner = self.lock();
        user.id = 0;
        if let Some(err) = inner.conflict(user) {
            return Err(err);
        }
        inner.next_id += 1;
        user.id = inner.next_id;
        inner.rows.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> RestResult<User> {
        self.lock()
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| RestErr::bad_request(format!("user {id} doesn't exist")))
    }

    async fn get_all(&self, limit: i64, offset: i64) -> RestResult<Vec<User>> {
        let inner = self.lock();
        let mut users: Vec<User> = inner.rows.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn update(&self, user: &User) -> RestResult<User> {
        let mut inner = self.lock();
        if let Some(err) = inner.conflict(user) {
            return Err(err);
        }
        let row = inner
            .rows
            .get_mut(&user.id)
            .ok_or_else(|| RestErr::bad_request(format!("user {} doesn't exist", user.id)))?;
        row.email = user.email.clone();
        row.nickname = user.nickname.clone();
        row.password = user.password.clone();
        row.updated_at = user.updated_at.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> RestResult<()> {
        match self.lock().rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RestErr::bad_request("no rows to be deleted")),
        }
    }

    async fn find_by_email(&self, email: &str) -> RestResult<Presence> {
        let exists = self.lock().rows.values().any(|u| u.email == email);
        Ok(if exists { Presence::Exists } else { Presence::Free })
    }

    async fn find_by_nickname(&self, nickname: &str) -> RestResult<Presence> {
        let exists = self.lock().rows.values().any(|u| u.nickname == nickname);
        Ok(if exists { Presence::Exists } else { Presence::Free })
    }

    async fn find_by_email_and_password(&self, email: &str, password: &str) -> RestResult<User> {
        let user = self
            .lock()
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| RestErr::bad_request(EMAIL_MISMATCH))?;
        match_password(user, password)
    }
}
