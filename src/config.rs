use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub hero_name: String,
    pub keep_incomplete: bool,
    pub interval: usize,
    pub output_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: PathBuf::from("data/hands.db"),
            hero_name: "Hero".to_string(),
            keep_incomplete: false,
            interval: 1,
            output_dir: PathBuf::from("charts"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let database_path = env_map
            .get("HANDLEDGER_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let hero_name = match env_map.get("HANDLEDGER_HERO_NAME") {
            Some(name) if name.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(
                    "HANDLEDGER_HERO_NAME".to_string(),
                    "must not be empty".to_string(),
                ))
            }
            Some(name) => name.trim().to_string(),
            None => defaults.hero_name,
        };

        let keep_incomplete = match env_map
            .get("HANDLEDGER_KEEP_INCOMPLETE")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            None => defaults.keep_incomplete,
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "HANDLEDGER_KEEP_INCOMPLETE".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        let interval = match env_map.get("HANDLEDGER_INTERVAL") {
            Some(raw) => parse_interval(raw).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "HANDLEDGER_INTERVAL".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?,
            None => defaults.interval,
        };

        let output_dir = env_map
            .get("HANDLEDGER_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        Ok(Config {
            database_path,
            hero_name,
            keep_incomplete,
            interval,
            output_dir,
        })
    }
}

fn parse_interval(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
