//! Client configuration, read from the environment.
//!
//! | Variable                      | Default                     |
//! |-------------------------------|-----------------------------|
//! | `DISCOVERY_API_BASE`          | `http://localhost:8000/api` |
//! | `DISCOVERY_APP_URL`           | `http://localhost:8080`     |
//! | `DISCOVERY_STATE_PATH`        | `.discovery_state.json`     |
//! | `DISCOVERY_PAGE_SIZE`         | `20`                        |
//! | `DISCOVERY_HTTP_TIMEOUT_SECS` | `30`                        |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use common::search_const::PAGE_SIZE;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub app_url: String,
    pub state_path: PathBuf,
    pub page_size: u32,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str, default: &str| lookup(name).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string());

        let api_base = url_var("DISCOVERY_API_BASE", var("DISCOVERY_API_BASE", "http://localhost:8000/api"))?;
        let app_url = url_var("DISCOVERY_APP_URL", var("DISCOVERY_APP_URL", "http://localhost:8080"))?;
        let state_path = PathBuf::from(var("DISCOVERY_STATE_PATH", ".discovery_state.json"));

        let page_size: u32 = var("DISCOVERY_PAGE_SIZE", &PAGE_SIZE.to_string())
            .parse()
            .context("DISCOVERY_PAGE_SIZE must be a positive integer")?;
        if page_size == 0 {
            bail!("DISCOVERY_PAGE_SIZE must be greater than zero");
        }

        let timeout_secs: u64 = var("DISCOVERY_HTTP_TIMEOUT_SECS", "30")
            .parse()
            .context("DISCOVERY_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("DISCOVERY_HTTP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self { api_base, app_url, state_path, page_size, http_timeout: Duration::from_secs(timeout_secs) })
    }
}

fn url_var(name: &str, value: String) -> anyhow::Result<String> {
    reqwest::Url::parse(&value).with_context(|| format!("{name} is not a valid URL: {value}"))?;
    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base, "http://localhost:8000/api");
        assert_eq!(config.app_url, "http://localhost:8080");
        assert_eq!(config.page_size, PAGE_SIZE);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = Config::from_lookup(lookup(&[("DISCOVERY_API_BASE", "https://example.org/api/"), ("DISCOVERY_PAGE_SIZE", "50")])).unwrap();
        assert_eq!(config.api_base, "https://example.org/api");
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = Config::from_lookup(lookup(&[("DISCOVERY_APP_URL", "not a url")])).unwrap_err();
        assert!(err.to_string().contains("DISCOVERY_APP_URL"), "{err}");

        let err = Config::from_lookup(lookup(&[("DISCOVERY_PAGE_SIZE", "0")])).unwrap_err();
        assert!(err.to_string().contains("DISCOVERY_PAGE_SIZE"), "{err}");

        let err = Config::from_lookup(lookup(&[("DISCOVERY_HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("DISCOVERY_HTTP_TIMEOUT_SECS"), "{err}");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DISCOVERY_HTTP_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"), "{err}");
    }
}
