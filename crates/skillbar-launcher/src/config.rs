use anyhow::anyhow;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[catalog]
path = "~/.skillbar/skills.json"  # JSON or YAML skill list

[usage]
backend = "sqlite"  # or "json"
path = "~/.skillbar/usage.db"

[gateway]
strategies = ["clipboard", "stdout"]  # tried in order until one succeeds

[logging]
level = "info"  # trace, debug, info, warn, error
json = false
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UsageBackend {
    Sqlite,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UsageConfig {
    pub backend: UsageBackend,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Clipboard,
    Stdout,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub strategies: Vec<StrategyKind>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub usage: UsageConfig,
    pub gateway: GatewayConfig,
    pub logging: LoggingConfig,
    /// Files and directories created by this load, reported once logging is up
    #[serde(skip)]
    pub created_paths: Vec<PathBuf>,
}

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

impl Config {
    /// Get the global config path: ~/.skillbar/skillbar.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".skillbar").join("skillbar.toml"))
    }

    /// Create the config directory and default file at `config_path` if missing
    ///
    /// Returns the paths that were created.
    fn ensure_config_file(config_path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut created = Vec::new();

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                created.push(config_dir.to_path_buf());
            }
        }

        if !config_path.exists() {
            fs::write(config_path, DEFAULT_CONFIG.trim())?;
            created.push(config_path.to_path_buf());
        }

        Ok(created)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.skillbar/skillbar.toml (auto-created if missing)
    /// 2. Local override: ./skillbar.toml (optional)
    /// 3. Environment variables with SKILLBAR__ prefix
    /// 4. Convenience variables SKILLBAR_CATALOG and SKILLBAR_LOG_LEVEL
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let global_config_path = Self::global_config_path()?;
        let created_paths = Self::ensure_config_file(&global_config_path)?;

        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("skillbar").required(false))
            .add_source(config::Environment::with_prefix("SKILLBAR").separator("__"));

        if let Ok(path) = env::var("SKILLBAR_CATALOG") {
            config_builder = config_builder.set_override("catalog.path", path)?;
        }

        if let Ok(level) = env::var("SKILLBAR_LOG_LEVEL") {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        let mut config: Self = config_builder.build()?.try_deserialize()?;
        config.created_paths = created_paths;
        Ok(config)
    }

    pub fn catalog_path(&self) -> PathBuf {
        expand_tilde(&self.catalog.path)
    }

    pub fn usage_path(&self) -> PathBuf {
        expand_tilde(&self.usage.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_deserializes() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.usage.backend, UsageBackend::Sqlite);
        assert_eq!(
            config.gateway.strategies,
            vec![StrategyKind::Clipboard, StrategyKind::Stdout]
        );
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_ensure_config_file_reports_created_paths_once() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".skillbar");
        let config_path = config_dir.join("skillbar.toml");

        let created = Config::ensure_config_file(&config_path).unwrap();
        assert_eq!(created, vec![config_dir, config_path.clone()]);

        let content = fs::read_to_string(&config_path).unwrap();
        let config: Config = toml::from_str(&content).unwrap();
        assert!(config.created_paths.is_empty());
        assert_eq!(config.logging.level, "info");

        assert!(Config::ensure_config_file(&config_path).unwrap().is_empty());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/tmp/usage.db"), PathBuf::from("/tmp/usage.db"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/.skillbar/a.json"), home.join(".skillbar/a.json"));
        }
    }
}
