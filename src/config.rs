/*!
 * gamedb config file
 */

use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::db::MEMORY_DATABASE;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub db_config: DbConfig,

    #[serde(default)]
    pub log_config: LogConfig,

    #[serde(default)]
    pub console_config: ConsoleConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct DbConfig {
    /// SQLite database path, or `:memory:` for a throwaway database
    pub database_url: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self { database_url: MEMORY_DATABASE.to_owned() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct LogConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filter: "warn".to_owned() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    /// Shown before each command when stdin is a terminal
    pub prompt: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { prompt: "gamedb> ".to_owned() }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
}
