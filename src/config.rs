use pantry_core::CategoryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn from_default(value: T) -> Self {
        Self::new(value, ConfigSource::Default)
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// What to do with categories outside the fixed set
    pub unknown_category: ConfigValue<CategoryPolicy>,
    /// Number of expiring-soon items listed on the dashboard
    pub top_expiring_limit: ConfigValue<usize>,
    /// Simulated receipt scan delay
    pub scan_delay_ms: ConfigValue<u64>,
    /// Simulated recipe generation delay
    pub recipe_delay_ms: ConfigValue<u64>,
    /// Give up on a scanner or recipe generator after this long
    pub collaborator_timeout_secs: ConfigValue<u64>,
    /// Inventory file loaded when a session starts
    pub seed_file: ConfigValue<Option<PathBuf>>,
    /// Recipe file used instead of the built-in suggestions
    pub recipe_catalog: ConfigValue<Option<PathBuf>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    unknown_category: Option<CategoryPolicy>,
    top_expiring_limit: Option<usize>,
    scan_delay_ms: Option<u64>,
    recipe_delay_ms: Option<u64>,
    collaborator_timeout_secs: Option<u64>,
    seed_file: Option<PathBuf>,
    recipe_catalog: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unknown_category: ConfigValue::from_default(CategoryPolicy::Reject),
            top_expiring_limit: ConfigValue::from_default(pantry_core::summary::TOP_EXPIRING_LIMIT),
            scan_delay_ms: ConfigValue::from_default(2000),
            recipe_delay_ms: ConfigValue::from_default(1500),
            collaborator_timeout_secs: ConfigValue::from_default(10),
            seed_file: ConfigValue::from_default(None),
            recipe_catalog: ConfigValue::from_default(None),
            config_file: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config.apply_file(file_config, &path);
            config.config_file = Some(path);
        }

        config.apply_env()?;

        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile, path: &Path) {
        if let Some(policy) = file.unknown_category {
            self.unknown_category = ConfigValue::new(policy, ConfigSource::File);
        }
        if let Some(limit) = file.top_expiring_limit {
            self.top_expiring_limit = ConfigValue::new(limit, ConfigSource::File);
        }
        if let Some(ms) = file.scan_delay_ms {
            self.scan_delay_ms = ConfigValue::new(ms, ConfigSource::File);
        }
        if let Some(ms) = file.recipe_delay_ms {
            self.recipe_delay_ms = ConfigValue::new(ms, ConfigSource::File);
        }
        if let Some(secs) = file.collaborator_timeout_secs {
            self.collaborator_timeout_secs = ConfigValue::new(secs, ConfigSource::File);
        }
        // Resolve relative paths against config file's directory
        if let Some(seed) = file.seed_file {
            self.seed_file = ConfigValue::new(Some(resolve(path, seed)), ConfigSource::File);
        }
        if let Some(catalog) = file.recipe_catalog {
            self.recipe_catalog = ConfigValue::new(Some(resolve(path, catalog)), ConfigSource::File);
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(policy) = env_value::<CategoryPolicy>("PANTRY_UNKNOWN_CATEGORY")? {
            self.unknown_category = ConfigValue::new(policy, ConfigSource::Environment);
        }
        if let Some(limit) = env_value::<usize>("PANTRY_TOP_EXPIRING_LIMIT")? {
            self.top_expiring_limit = ConfigValue::new(limit, ConfigSource::Environment);
        }
        if let Some(ms) = env_value::<u64>("PANTRY_SCAN_DELAY_MS")? {
            self.scan_delay_ms = ConfigValue::new(ms, ConfigSource::Environment);
        }
        if let Some(ms) = env_value::<u64>("PANTRY_RECIPE_DELAY_MS")? {
            self.recipe_delay_ms = ConfigValue::new(ms, ConfigSource::Environment);
        }
        if let Some(secs) = env_value::<u64>("PANTRY_COLLABORATOR_TIMEOUT_SECS")? {
            self.collaborator_timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }
        if let Ok(seed) = std::env::var("PANTRY_SEED_FILE") {
            self.seed_file = ConfigValue::new(Some(PathBuf::from(seed)), ConfigSource::Environment);
        }
        if let Ok(catalog) = std::env::var("PANTRY_RECIPE_CATALOG") {
            self.recipe_catalog =
                ConfigValue::new(Some(PathBuf::from(catalog)), ConfigSource::Environment);
        }
        Ok(())
    }

    pub fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms.value)
    }

    pub fn recipe_delay(&self) -> Duration {
        Duration::from_millis(self.recipe_delay_ms.value)
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs.value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/pantry/
    /// - macOS: ~/Library/Application Support/pantry/
    /// - Windows: %APPDATA%/pantry/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pantry")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn resolve(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

fn env_value<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnv(name, raw.clone(), e.to_string())),
        Err(_) => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(&'static str, String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(name, value, e) => {
                write!(f, "Invalid value '{}' for {}: {}", value, name, e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.unknown_category.value, CategoryPolicy::Reject);
        assert_eq!(config.unknown_category.source, ConfigSource::Default);
        assert_eq!(config.top_expiring_limit.value, 5);
        assert_eq!(config.scan_delay(), Duration::from_millis(2000));
        assert_eq!(config.recipe_delay(), Duration::from_millis(1500));
        assert!(config.seed_file.value.is_none());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "unknown_category: other").unwrap();
        writeln!(file, "top_expiring_limit: 3").unwrap();
        writeln!(file, "scan_delay_ms: 0").unwrap();
        writeln!(file, "seed_file: /custom/path/pantry.yaml").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.unknown_category.value, CategoryPolicy::Other);
        assert_eq!(config.unknown_category.source, ConfigSource::File);
        assert_eq!(config.top_expiring_limit.value, 3);
        assert_eq!(config.scan_delay_ms.value, 0);
        assert_eq!(
            config.seed_file.value,
            Some(PathBuf::from("/custom/path/pantry.yaml"))
        );
        assert_eq!(config.recipe_delay_ms.source, ConfigSource::Default);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "recipe_catalog: recipes.yaml").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(
            config.recipe_catalog.value,
            Some(temp_dir.path().join("recipes.yaml"))
        );
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "top_expiring_limit: 3").unwrap();

        std::env::set_var("PANTRY_TOP_EXPIRING_LIMIT", "8");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.top_expiring_limit.value, 8);
        assert_eq!(config.top_expiring_limit.source, ConfigSource::Environment);

        std::env::remove_var("PANTRY_TOP_EXPIRING_LIMIT");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_unknown_policy_in_file_is_parse_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "unknown_category: drop").unwrap();

        assert!(matches!(
            Config::load(Some(config_path)),
            Err(ConfigError::ParseError(..))
        ));
    }
}
