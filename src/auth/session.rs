//! Who is using the app right now.
//!
//! One session per device: the logged-in user lives in memory and a copy
//! of `{id, email, name}` is kept in [`SessionStorage`] so that it survives a
//! restart. There are no tokens and no expiry; this is not production
//! authentication.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use async_trait::async_trait;
use axum::http::StatusCode;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::{
    password::{hash_password, normalize_email, verify_password},
    repo::UserRegistry,
    repo_types::SessionUser,
};

/// Storage key of the session record.
pub const SESSION_KEY: &str = "fitnessUser";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email already in use")]
    EmailInUse,
    #[error("session storage: {0:#}")]
    Storage(anyhow::Error),
    #[error("password hashing: {0:#}")]
    Hashing(anyhow::Error),
}

impl From<AuthError> for (StatusCode, String) {
    fn from(e: AuthError) -> Self {
        let status = match e {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmailInUse => StatusCode::CONFLICT,
            AuthError::Storage(_) | AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, e.to_string())
    }
}

/// Durable key/value storage for the session record.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// One `<key>.json` file per key under `dir`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.path(key);
        tokio::fs::write(&path, value)
            .await
            .with_context(|| format!("write {}", path.display()))
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values().remove(key);
        Ok(())
    }
}

pub struct SessionContext {
    registry: Arc<UserRegistry>,
    storage: Arc<dyn SessionStorage>,
    current: RwLock<Option<SessionUser>>,
}

impl SessionContext {
    /// Builds the context, picking up a previously stored session record.
    /// Unreadable or malformed records are dropped.
    pub async fn restore(registry: Arc<UserRegistry>, storage: Arc<dyn SessionStorage>) -> Self {
        let current = match storage.get(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => {
                    info!(user_id = %user.id, "session restored");
                    Some(user)
                }
                Err(e) => {
                    warn!(error = %e, "discarding malformed session record");
                    if let Err(e) = storage.remove(SESSION_KEY).await {
                        error!(error = %e, "failed to remove malformed session record");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "session storage unreadable; starting logged out");
                None
            }
        };

        Self {
            registry,
            storage,
            current: RwLock::new(current),
        }
    }

    pub async fn current(&self) -> Option<SessionUser> {
        self.current.read().await.clone()
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        let email = normalize_email(email);
        let Some(record) = self.registry.find_by_email(&email).await else {
            warn!(email = %email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        let ok = verify_password(password, &record.password_hash).map_err(AuthError::Hashing)?;
        if !ok {
            warn!(email = %email, user_id = %record.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let user = SessionUser::from(&record);
        self.establish(user.clone()).await?;
        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(user)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError> {
        let email = normalize_email(email);
        if self.registry.find_by_email(&email).await.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AuthError::EmailInUse);
        }
        let hash = hash_password(password).map_err(AuthError::Hashing)?;
        let record = self.registry.create(name.trim(), &email, hash).await?;

        let user = SessionUser::from(&record);
        self.establish(user.clone()).await?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        let previous = self.current.write().await.take();
        if let Some(user) = previous {
            info!(user_id = %user.id, "user logged out");
        }
        self.storage
            .remove(SESSION_KEY)
            .await
            .map_err(AuthError::Storage)
    }

    // Persist first so a storage failure leaves the previous session in place.
    async fn establish(&self, user: SessionUser) -> Result<(), AuthError> {
        let raw = serde_json::to_string(&user)
            .map_err(|e| AuthError::Storage(anyhow::Error::new(e)))?;
        self.storage
            .set(SESSION_KEY, &raw)
            .await
            .map_err(AuthError::Storage)?;
        *self.current.write().await = Some(user);
        Ok(())
    }
}
