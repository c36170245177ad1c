use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::store::{JobStore, StoreError, UserStore};
use crate::domain::{Job, NewJob, NewUser, User, UserUpdate};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    jobs: Vec<Job>,
}

/// In-process store with the same semantics as [`crate::db::PgStore`].
///
/// Counts user lookups and can be switched into an "unavailable" mode so that
/// callers can observe how store I/O and store outages are handled.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    user_lookups: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed user, keeping its id. Replaces any user with the
    /// same id.
    pub async fn seed_user(&self, user: User) {
        self.tables.write().await.users.insert(user.id.clone(), user);
    }

    pub fn user_lookup_count(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            image: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        email: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.values_mut().find(|user| user.email == email) else {
            return Ok(None);
        };

        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, email: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let Some(id) = tables
            .users
            .values()
            .find(|user| user.email == email)
            .map(|user| user.id.clone())
        else {
            return Ok(false);
        };

        tables.users.remove(&id);
        for job in tables.jobs.iter_mut() {
            if job.created_by.as_deref() == Some(id.as_str()) {
                job.created_by = None;
            }
        }
        Ok(true)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.check_available()?;
        let mut users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, job: NewJob) -> Result<Job, StoreError> {
        self.check_available()?;
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4().to_string(),
            company_name: job.company_name,
            job_title: job.job_title,
            description: job.description,
            salary: job.salary,
            created_by: Some(job.created_by),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.jobs.push(job.clone());
        Ok(job)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.check_available()?;
        // Insertion order reversed, then a stable sort keeps same-instant jobs newest first.
        let mut jobs: Vec<Job> = self.tables.read().await.jobs.iter().rev().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn list_jobs_page(&self, offset: i64, limit: i64) -> Result<Vec<Job>, StoreError> {
        let jobs = self.list_jobs().await?;
        Ok(jobs
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_jobs(&self) -> Result<i64, StoreError> {
        self.check_available()?;
        Ok(self.tables.read().await.jobs.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Jane Doe".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Employee,
        }
    }

    fn new_job(title: &str, created_by: &str) -> NewJob {
        NewJob {
            company_name: "ABC Corp".to_string(),
            job_title: title.to_string(),
            description: "Build things".to_string(),
            salary: "100000".to_string(),
            created_by: created_by.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("jane@gmail.com")).await.unwrap();

        let by_id = store.find_user_by_id(&user.id).await.unwrap();
        let by_email = store.find_user_by_email("jane@gmail.com").await.unwrap();
        assert_eq!(by_id, Some(user.clone()));
        assert_eq!(by_email, Some(user));
        assert_eq!(store.user_lookup_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("jane@gmail.com")).await.unwrap();
        let err = store.insert_user(new_user("jane@gmail.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "jane@gmail.com"));
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let store = MemoryStore::new();
        store.insert_user(new_user("jane@gmail.com")).await.unwrap();

        let updated = store
            .update_user(
                "jane@gmail.com",
                UserUpdate {
                    full_name: Some("Jane A Doe".to_string()),
                    password_hash: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "Jane A Doe");
        assert_eq!(updated.password_hash, "hash");

        let missing = store
            .update_user("nobody@gmail.com", UserUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_orphans_their_jobs() {
        let store = MemoryStore::new();
        let admin = store.insert_user(new_user("boss@gmail.com")).await.unwrap();
        store.insert_job(new_job("Engineer", &admin.id)).await.unwrap();

        assert!(store.delete_user("boss@gmail.com").await.unwrap());
        assert!(!store.delete_user("boss@gmail.com").await.unwrap());

        let jobs = store.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].created_by, None);
    }

    #[tokio::test]
    async fn test_jobs_listed_newest_first_and_paged() {
        let store = MemoryStore::new();
        for title in ["first", "second", "third"] {
            store.insert_job(new_job(title, "u1")).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_jobs()
            .await
            .unwrap()
            .into_iter()
            .map(|job| job.job_title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);

        let page = store.list_jobs_page(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].job_title, "second");
        assert_eq!(store.count_jobs().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_lookups() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.find_user_by_id("u1").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.ping().await.is_err());
    }
}
