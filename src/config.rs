use std::str::FromStr;

use anyhow::Context;

use crate::store::DEFAULT_EVENT_CAPACITY;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SESSION_INACTIVITY_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Unset means the in-memory backend.
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub session_inactivity: time::Duration,
    pub event_capacity: usize,
}

impl Config {
    /// Reads the process environment, `.env` included.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
        where
            T: FromStr,
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            match lookup(key) {
                Some(raw) => raw.trim().parse().with_context(|| format!("invalid {key}: {raw}")),
                None => Ok(default),
            }
        }

        Ok(Config {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned()),
            session_inactivity: time::Duration::minutes(
                parse_or(&lookup, "SESSION_INACTIVITY_MINUTES", DEFAULT_SESSION_INACTIVITY_MINUTES)?,
            ),
            event_capacity: parse_or(&lookup, "EVENT_CAPACITY", DEFAULT_EVENT_CAPACITY)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.session_inactivity, time::Duration::minutes(30));
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://chat.db?mode=rwc"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("SESSION_INACTIVITY_MINUTES", "5"),
            ("EVENT_CAPACITY", "8"),
        ])).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite://chat.db?mode=rwc"));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.session_inactivity, time::Duration::minutes(5));
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn blank_database_url_means_memory() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = Config::from_lookup(lookup(&[("EVENT_CAPACITY", "lots")])).unwrap_err();
        assert!(err.to_string().contains("EVENT_CAPACITY"));
    }
}
