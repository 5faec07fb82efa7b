use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub store: StoreConfig,
}

/// Engine tuning: traversal bound and suggestion fan-out
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Hop ceiling for path search ("six degrees").
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Suggestions surfaced per mission degree.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Graph provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

fn default_max_depth() -> usize {
    6
}

fn default_suggestion_limit() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in KINGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KINGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.engine.max_depth == 0 {
            anyhow::bail!("engine.max_depth must be greater than 0");
        }

        // The product caps missions at six degrees; a larger bound would let
        // path search outrun what missions can record.
        if self.engine.max_depth > 6 {
            anyhow::bail!(
                "engine.max_depth must not exceed 6, got {}",
                self.engine.max_depth
            );
        }

        if self.engine.suggestion_limit == 0 {
            anyhow::bail!("engine.suggestion_limit must be greater than 0");
        }

        Ok(())
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.store.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide cwd and env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn write_config(temp_dir: &TempDir, max_depth: usize) -> PathBuf {
        let content = format!(
            r#"
[engine]
max_depth = {}
suggestion_limit = 3
log_level = "debug"

[store]
db_path = "./test.db"
"#,
            max_depth
        );
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();
        config_path.canonicalize().unwrap()
    }

    fn with_config_env(config_path: &Path, f: impl FnOnce()) {
        let original = std::env::var("KINGRAPH_CONFIG").ok();
        std::env::set_var("KINGRAPH_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("KINGRAPH_CONFIG");
        if let Some(val) = original {
            std::env::set_var("KINGRAPH_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(&temp_dir, 6);
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.engine.max_depth, 6);
            assert_eq!(config.engine.suggestion_limit, 3);
            assert_eq!(config.engine.log_level, "debug");
            assert_eq!(config.db_path(), Path::new("./test.db"));
        });
    }

    #[test]
    fn test_config_rejects_depth_above_six() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(&temp_dir, 7);
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("max_depth"));
        });
    }

    #[test]
    fn test_config_rejects_zero_depth() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(&temp_dir, 0);
        with_config_env(&config_path, || {
            assert!(Config::load().is_err());
        });
    }

    #[test]
    fn test_config_defaults_applied() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let content = r#"
[engine]

[store]
db_path = "./kingraph.db"
"#;
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();
        let config_path = config_path.canonicalize().unwrap();
        with_config_env(&config_path, || {
            let config = Config::load().unwrap();
            assert_eq!(config.engine.max_depth, 6);
            assert_eq!(config.engine.suggestion_limit, 3);
            assert_eq!(config.engine.log_level, "info");
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("KINGRAPH_CONFIG").ok();
        std::env::set_var("KINGRAPH_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("KINGRAPH_CONFIG");
        if let Some(v) = original {
            std::env::set_var("KINGRAPH_CONFIG", v);
        }
    }
}
