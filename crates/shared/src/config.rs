//! Application configuration management.
//!
//! Sources, later ones winning:
//! 1. `config/default.toml`
//! 2. `config/{RUN_MODE}.toml`
//! 3. `GEMLEDGER__SECTION__KEY` environment variables

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Tag vocabulary configuration.
    #[serde(default)]
    pub tags: TagConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file. `:memory:` opens a private in-memory database.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "gemledger.sqlite3".to_string()
}

/// Tag vocabulary configuration.
///
/// Deployments may vary the vocabulary without recompiling.
#[derive(Debug, Clone, Deserialize)]
pub struct TagConfig {
    /// Labels an entry or tag rule may use.
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,
    /// Label applied to both legs of an account transfer.
    #[serde(default = "default_transfer_tag")]
    pub transfer_tag: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            transfer_tag: default_transfer_tag(),
        }
    }
}

fn default_vocabulary() -> Vec<String> {
    [
        "bureaucracy",
        "car",
        "change",
        "food",
        "fun",
        "health",
        "house",
        "maintainance",
        "other",
        "rent",
        "taxes",
        "travel",
        "utilities",
        "withdraw",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_transfer_tag() -> String {
    "change".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "gemledger=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("GEMLEDGER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("tags.vocabulary"),
            )
            .build()?;

        config.try_deserialize()
    }
}
