use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{password::hash_password, repo_types::UserRecord, session::AuthError};
use crate::store::seed::{demo_user_id, DEMO_USER_EMAIL, DEMO_USER_NAME, DEMO_USER_PASSWORD};

/// In-memory list of registered users. Resets with the process.
#[derive(Default)]
pub struct UserRegistry {
    users: RwLock<Vec<UserRecord>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the demo account.
    pub fn seeded() -> anyhow::Result<Self> {
        let demo = UserRecord {
            id: demo_user_id(),
            email: DEMO_USER_EMAIL.into(),
            name: DEMO_USER_NAME.into(),
            password_hash: hash_password(DEMO_USER_PASSWORD)?,
            created_at: OffsetDateTime::now_utc(),
        };
        Ok(Self {
            users: RwLock::new(vec![demo]),
        })
    }

    /// Find a user by (already normalized) email.
    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Append a new user. Fails without touching the list if the email is taken.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: String,
    ) -> Result<UserRecord, AuthError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::EmailInUse);
        }
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_leaves_registry_untouched() {
        let registry = UserRegistry::new();
        registry
            .create("Ann", "ann@example.com", "h1".into())
            .await
            .expect("first create");
        let err = registry
            .create("Other Ann", "ann@example.com", "h2".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailInUse));
        assert_eq!(registry.len().await, 1);
        let ann = registry.find_by_email("ann@example.com").await.unwrap();
        assert_eq!(ann.name, "Ann");
        assert_eq!(ann.password_hash, "h1");
    }

    #[tokio::test]
    async fn seeded_registry_has_demo_user() {
        let registry = UserRegistry::seeded().unwrap();
        let demo = registry.find_by_email(DEMO_USER_EMAIL).await.unwrap();
        assert_eq!(demo.id, demo_user_id());
        assert_eq!(demo.name, DEMO_USER_NAME);
        assert_ne!(demo.password_hash, DEMO_USER_PASSWORD);
    }
}
