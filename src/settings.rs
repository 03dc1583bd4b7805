use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const INDEX_URL: &str = "http://mts.ro/proiecte-legislative-in-dezbatere-publica/";
const DB_PATH: &str = "data/tineret.sqlite";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; tineret_scraper/0.1)";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub index_url: String,
    pub db_path: PathBuf,
    /// Pages fetched at the same time.
    pub concurrency: usize,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Settings {
    /// Defaults, then `tineret.toml` if present, then `TINERET_*` env vars.
    pub fn load() -> Result<Self> {
        Self::builder(Environment::with_prefix("TINERET").try_parsing(true))?
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    fn builder(env: Environment) -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("index_url", INDEX_URL)?
            .set_default("db_path", DB_PATH)?
            .set_default("concurrency", 4)?
            .set_default("user_agent", USER_AGENT)?
            .set_default("timeout_secs", 30)?
            .add_source(File::with_name("tineret").required(false))
            .add_source(env))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load_with(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let env = Environment::with_prefix("TINERET")
            .try_parsing(true)
            .source(Some(vars));
        Settings::builder(env)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults() {
        let s = load_with(&[]);
        assert_eq!(s.index_url, INDEX_URL);
        assert_eq!(s.db_path, PathBuf::from("data/tineret.sqlite"));
        assert_eq!(s.concurrency, 4);
        assert_eq!(s.timeout_secs, 30);
    }

    #[test]
    fn env_overrides() {
        let s = load_with(&[
            ("TINERET_DB_PATH", "/tmp/t.sqlite"),
            ("TINERET_CONCURRENCY", "8"),
        ]);
        assert_eq!(s.db_path, PathBuf::from("/tmp/t.sqlite"));
        assert_eq!(s.concurrency, 8);
        assert_eq!(s.index_url, INDEX_URL);
    }
}
