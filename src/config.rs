use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::omdb::OMDB_BASE;

const DEFAULT_BIND: &str = "0.0.0.0:3147";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub omdb_timeout: Duration,
    pub bind: SocketAddr,
    pub dataset_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let omdb_api_key = get("OMDB_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: OMDB_API_KEY"))?;
        let omdb_base_url = get("OMDB_BASE_URL").unwrap_or_else(|| OMDB_BASE.to_string());
        let omdb_timeout = match get("OMDB_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("OMDB_TIMEOUT_SECS is not a number: {raw}"))?;
                if secs == 0 {
                    bail!("OMDB_TIMEOUT_SECS must be at least 1 second");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let bind_raw = get("CINEFLEX_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw
            .trim()
            .parse()
            .with_context(|| format!("CINEFLEX_BIND is not a socket address: {bind_raw}"))?;
        let dataset_path = get("CINEFLEX_DATASET").map(PathBuf::from);

        Ok(Self {
            omdb_api_key,
            omdb_base_url,
            omdb_timeout,
            bind,
            dataset_path,
        })
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let cfg = Config::from_lookup(lookup(&[("OMDB_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.omdb_api_key, "k");
        assert_eq!(cfg.omdb_base_url, OMDB_BASE);
        assert_eq!(cfg.omdb_timeout, Duration::from_secs(15));
        assert_eq!(cfg.bind.port(), 3147);
        assert!(cfg.dataset_path.is_none());
    }

    #[test]
    fn requires_api_key() {
        let err = Config::from_lookup(lookup(&[("OMDB_API_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("OMDB_API_KEY"));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "k"),
            ("OMDB_TIMEOUT_SECS", "soon"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "k"),
            ("CINEFLEX_BIND", "localhost"),
        ]))
        .is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "k"),
            ("OMDB_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("OMDB_TIMEOUT_SECS"));
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "k"),
            ("OMDB_BASE_URL", "http://127.0.0.1:9/"),
            ("OMDB_TIMEOUT_SECS", "3"),
            ("CINEFLEX_BIND", "127.0.0.1:8080"),
            ("CINEFLEX_DATASET", "/tmp/movies.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.omdb_base_url, "http://127.0.0.1:9/");
        assert_eq!(cfg.omdb_timeout, Duration::from_secs(3));
        assert_eq!(cfg.bind.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.dataset_path, Some(PathBuf::from("/tmp/movies.json")));
    }
}
