use std::sync::Arc;

use anyhow::Context;

use crate::{
    auth::{
        repo::UserRegistry,
        session::{FileSessionStorage, SessionContext, SessionStorage},
    },
    builder::registry::BuilderRegistry,
    config::{AppConfig, SessionConfig, StoreConfig},
    store::{memory::InMemoryStore, seed::seed_data, FitnessStore},
    timer::{Clock, SystemClock},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn FitnessStore>,
    pub session: Arc<SessionContext>,
    pub builders: Arc<BuilderRegistry>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let registry = Arc::new(UserRegistry::seeded().context("seeding user registry")?);
        let storage = Arc::new(FileSessionStorage::new(config.session.dir.clone()))
            as Arc<dyn SessionStorage>;
        let session = Arc::new(SessionContext::restore(registry, storage).await);

        let store = Arc::new(InMemoryStore::with_seed(
            seed_data(clock.now().date()),
            config.store.latency(),
        )) as Arc<dyn FitnessStore>;

        Ok(Self {
            config,
            store,
            session,
            builders: Arc::new(BuilderRegistry::new()),
            clock,
        })
    }

    #[cfg(test)]
    pub async fn fake() -> Self {
        Self::fake_with_clock(Arc::new(SystemClock)).await
    }

    /// Seeded, zero-latency state with in-memory session storage. The demo
    /// history is dated from `clock`.
    #[cfg(test)]
    pub async fn fake_with_clock(clock: Arc<dyn Clock>) -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            store: StoreConfig { latency_ms: 0 },
            session: SessionConfig {
                dir: std::env::temp_dir().join("fitlog-test"),
            },
        });

        let registry = Arc::new(UserRegistry::seeded().expect("seeded registry"));
        let storage = Arc::new(crate::auth::session::MemorySessionStorage::new())
            as Arc<dyn SessionStorage>;
        let session = Arc::new(SessionContext::restore(registry, storage).await);

        let store = Arc::new(InMemoryStore::with_seed(
            seed_data(clock.now().date()),
            std::time::Duration::ZERO,
        )) as Arc<dyn FitnessStore>;

        Self {
            config,
            store,
            session,
            builders: Arc::new(BuilderRegistry::new()),
            clock,
        }
    }
}
