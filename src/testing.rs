// In-memory stand-ins for the PostgreSQL and Redis seams, used by unit and
// HTTP tests

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::cache::{CacheError, CacheStore};
use crate::error::ApiError;
use crate::posts::{Post, PostStore, PreparedPost};
use crate::users::{User, UserCredentials, UserProfile, UserRepository};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password: String,
}

/// User repository over a mutex-guarded map, enforcing unique email and nick
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<Uuid, StoredUser>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn nick_of(&self, id: Uuid) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|stored| stored.user.nick.clone())
    }

    fn check_unique(
        users: &HashMap<Uuid, StoredUser>,
        except: Option<Uuid>,
        profile: &UserProfile,
    ) -> Result<(), ApiError> {
        for stored in users.values().filter(|s| Some(s.user.id) != except) {
            if stored.user.email == profile.email {
                return Err(ApiError::Conflict {
                    message: "Email already exists".to_string(),
                });
            }
            if stored.user.nick == profile.nick {
                return Err(ApiError::Conflict {
                    message: "Nick already exists".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, profile: &UserProfile, password_hash: &str) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        Self::check_unique(&users, None, profile)?;

        let user = User {
            id: Uuid::new_v4(),
            name: profile.name.clone(),
            nick: profile.nick.clone(),
            email: profile.email.clone(),
            created_at: Utc::now(),
        };
        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password: password_hash.to_string(),
            },
        );
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, ApiError> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|stored| stored.user.clone())
            .ok_or_else(|| ApiError::not_found("User", id))
    }

    async fn search_by_email(&self, email: &str) -> Result<UserCredentials, ApiError> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|stored| stored.user.email == email)
            .map(|stored| UserCredentials {
                id: stored.user.id,
                password: stored.password.clone(),
            })
            .ok_or_else(|| ApiError::not_found("User", email))
    }

    async fn search_password(&self, id: Uuid) -> Result<String, ApiError> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|stored| stored.password.clone())
            .ok_or_else(|| ApiError::not_found("User", id))
    }

    async fn update(&self, id: Uuid, profile: &UserProfile) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        Self::check_unique(&users, Some(id), profile)?;

        let stored = users
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("User", id))?;
        stored.user.name = profile.name.clone();
        stored.user.nick = profile.nick.clone();
        stored.user.email = profile.email.clone();
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("User", id))?;
        stored.password = password_hash.to_string();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found("User", id))
    }
}

#[derive(Debug, Clone)]
struct StoredPost {
    id: Uuid,
    title: String,
    content: String,
    author_id: Uuid,
    likes: i64,
    created_at: DateTime<Utc>,
}

/// Post store over a mutex-guarded map
///
/// Author nicks are resolved through the shared user repository, like the
/// join in the real store. Each insert is stamped one second after the
/// previous one so newest-first ordering is deterministic.
#[derive(Debug)]
pub struct MemoryPostStore {
    users: Arc<MemoryUserRepository>,
    posts: Mutex<HashMap<Uuid, StoredPost>>,
    epoch: DateTime<Utc>,
    inserts: AtomicUsize,
    find_all_calls: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryPostStore {
    pub fn new(users: Arc<MemoryUserRepository>) -> Self {
        Self {
            users,
            posts: Mutex::new(HashMap::new()),
            epoch: Utc::now(),
            inserts: AtomicUsize::new(0),
            find_all_calls: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of times the listing was read from the store
    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    /// Number of mutating calls that reached the store
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn likes_of(&self, id: Uuid) -> Option<i64> {
        self.posts.lock().unwrap().get(&id).map(|post| post.likes)
    }

    pub fn set_likes(&self, id: Uuid, likes: i64) {
        if let Some(post) = self.posts.lock().unwrap().get_mut(&id) {
            post.likes = likes;
        }
    }

    fn to_post(&self, stored: &StoredPost) -> Post {
        Post {
            id: stored.id,
            title: stored.title.clone(),
            content: stored.content.clone(),
            author_id: stored.author_id,
            author_nick: self.users.nick_of(stored.author_id).unwrap_or_default(),
            likes: stored.likes,
            created_at: stored.created_at,
        }
    }

    fn modify<F: FnOnce(&mut StoredPost)>(&self, id: Uuid, change: F) -> u64 {
        self.writes.fetch_add(1, Ordering::SeqCst);
        match self.posts.lock().unwrap().get_mut(&id) {
            Some(post) => {
                change(post);
                1
            }
            None => 0,
        }
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, author_id: Uuid, post: &PreparedPost) -> Result<Uuid, ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.users.nick_of(author_id).is_none() {
            return Err(ApiError::Conflict {
                message: "Resource is still referenced".to_string(),
            });
        }

        let sequence = self.inserts.fetch_add(1, Ordering::SeqCst) as i64;
        let stored = StoredPost {
            id: Uuid::new_v4(),
            title: post.title.clone(),
            content: post.content.clone(),
            author_id,
            likes: 0,
            created_at: self.epoch + ChronoDuration::seconds(sequence),
        };
        let id = stored.id;
        self.posts.lock().unwrap().insert(id, stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, ApiError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.get(&id).map(|stored| self.to_post(stored)))
    }

    async fn find_all(&self) -> Result<Vec<Post>, ApiError> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);

        let posts = self.posts.lock().unwrap();
        let mut all: Vec<Post> = posts.values().map(|stored| self.to_post(stored)).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update(&self, id: Uuid, post: &PreparedPost) -> Result<u64, ApiError> {
        Ok(self.modify(id, |stored| {
            stored.title = post.title.clone();
            stored.content = post.content.clone();
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.posts.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }

    async fn increment_likes(&self, id: Uuid) -> Result<u64, ApiError> {
        Ok(self.modify(id, |stored| stored.likes += 1))
    }

    async fn decrement_likes(&self, id: Uuid) -> Result<u64, ApiError> {
        Ok(self.modify(id, |stored| {
            if stored.likes > 0 {
                stored.likes -= 1;
            }
        }))
    }
}

/// Cache whose every call fails, as if Redis went away mid-flight
#[derive(Debug, Default)]
pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Timeout {
            operation: "GET",
            millis: 500,
        })
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Timeout {
            operation: "SET",
            millis: 500,
        })
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Timeout {
            operation: "DEL",
            millis: 500,
        })
    }
}

/// Register a user straight through the repository, bypassing hashing
pub async fn seed_user(users: &MemoryUserRepository, nick: &str) -> Uuid {
    let profile = UserProfile {
        name: nick.to_string(),
        nick: nick.to_string(),
        email: format!("{}@example.com", nick),
    };
    users.create(&profile, "not-a-real-hash").await.unwrap().id
}
