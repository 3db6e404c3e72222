use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Simulated latency applied to every store call.
    pub latency_ms: u64,
}

impl StoreConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the durable session record.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match var("APP_PORT") {
            Some(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            None => 8080,
        };
        let latency_ms = match var("STORE_LATENCY_MS") {
            Some(v) => v
                .parse::<u64>()
                .context("STORE_LATENCY_MS must be a whole number of milliseconds")?,
            None => 0,
        };
        Ok(Self {
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            store: StoreConfig { latency_ms },
            session: SessionConfig {
                dir: var("SESSION_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".fitlog")),
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.store.latency(), Duration::ZERO);
        assert_eq!(cfg.session.dir, PathBuf::from(".fitlog"));
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "3000"),
            ("STORE_LATENCY_MS", "500"),
            ("SESSION_DIR", "/tmp/fit"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
        assert_eq!(cfg.store.latency(), Duration::from_millis(500));
        assert_eq!(cfg.session.dir, PathBuf::from("/tmp/fit"));
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = AppConfig::from_lookup(lookup(&[("STORE_LATENCY_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("STORE_LATENCY_MS"));
    }
}
