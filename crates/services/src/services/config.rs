use std::{str::FromStr, time::Duration};

use tracing::warn;

pub const DEFAULT_VALIDITY_WINDOW: Duration = Duration::from_secs(5 * 60);

const TTL_ENV: &str = "WORK_ORDER_CACHE_TTL_SECS";
const SENTINEL_ENV: &str = "WORK_ORDER_SENTINEL_FALLBACK";
const COALESCE_ENV: &str = "WORK_ORDER_COALESCE_REQUESTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderServiceConfig {
    /// How long a populated cache is served without touching the store
    pub validity_window: Duration,
    /// Serve the placeholder record when no live or cached data exists
    pub sentinel_fallback: bool,
    /// Let concurrent refreshes share a single pass through the strategy chain
    pub coalesce_in_flight: bool,
}

impl Default for WorkOrderServiceConfig {
    fn default() -> Self {
        Self {
            validity_window: DEFAULT_VALIDITY_WINDOW,
            sentinel_fallback: true,
            coalesce_in_flight: false,
        }
    }
}

impl WorkOrderServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            validity_window: parse_var::<u64>(&lookup, TTL_ENV)
                .map(Duration::from_secs)
                .unwrap_or(defaults.validity_window),
            sentinel_fallback: parse_flag(&lookup, SENTINEL_ENV)
                .unwrap_or(defaults.sentinel_fallback),
            coalesce_in_flight: parse_flag(&lookup, COALESCE_ENV)
                .unwrap_or(defaults.coalesce_in_flight),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable config value");
            None
        }
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(key, value = %raw, "Ignoring unparsable config flag");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = WorkOrderServiceConfig::from_lookup(lookup(&[]));
        assert_eq!(config, WorkOrderServiceConfig::default());
        assert_eq!(config.validity_window, Duration::from_secs(300));
    }

    #[test]
    fn test_env_overrides() {
        let config = WorkOrderServiceConfig::from_lookup(lookup(&[
            (TTL_ENV, "30"),
            (SENTINEL_ENV, "false"),
            (COALESCE_ENV, "ON"),
        ]));
        assert_eq!(config.validity_window, Duration::from_secs(30));
        assert!(!config.sentinel_fallback);
        assert!(config.coalesce_in_flight);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = WorkOrderServiceConfig::from_lookup(lookup(&[
            (TTL_ENV, "five minutes"),
            (SENTINEL_ENV, "maybe"),
        ]));
        assert_eq!(config, WorkOrderServiceConfig::default());
    }
}
