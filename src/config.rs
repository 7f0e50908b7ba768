use healthcoach_core::{Catalog, CatalogError, Workout, PROTEIN_GOAL, WATER_GOAL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

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
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the `<key>.json` store files
    pub data_dir: ConfigValue<PathBuf>,
    /// Daily protein goal in grams
    pub protein_goal: ConfigValue<u32>,
    /// Daily water goal in ounces
    pub water_goal: ConfigValue<u32>,
    /// Custom workout catalog (JSON or YAML); the bundled one is used if unset
    pub catalog_path: ConfigValue<Option<PathBuf>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    protein_goal: Option<u32>,
    water_goal: Option<u32>,
    catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut protein_goal = ConfigValue::new(PROTEIN_GOAL, ConfigSource::Default);
        let mut water_goal = ConfigValue::new(WATER_GOAL, ConfigSource::Default);
        let mut catalog_path = ConfigValue::new(None, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            if let Some(dir) = file_config.data_dir {
                data_dir = ConfigValue::new(resolve_relative(&path, dir), ConfigSource::File);
            }
            if let Some(goal) = file_config.protein_goal {
                protein_goal = ConfigValue::new(goal, ConfigSource::File);
            }
            if let Some(goal) = file_config.water_goal {
                water_goal = ConfigValue::new(goal, ConfigSource::File);
            }
            if let Some(catalog) = file_config.catalog_path {
                catalog_path =
                    ConfigValue::new(Some(resolve_relative(&path, catalog)), ConfigSource::File);
            }

            config_file = Some(path);
        }

        if let Some(dir) = env("COACH_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(goal) = env("COACH_PROTEIN_GOAL") {
            let goal = parse_goal("COACH_PROTEIN_GOAL", &goal)?;
            protein_goal = ConfigValue::new(goal, ConfigSource::Environment);
        }
        if let Some(goal) = env("COACH_WATER_GOAL") {
            let goal = parse_goal("COACH_WATER_GOAL", &goal)?;
            water_goal = ConfigValue::new(goal, ConfigSource::Environment);
        }
        if let Some(catalog) = env("COACH_CATALOG_PATH") {
            catalog_path = ConfigValue::new(Some(PathBuf::from(catalog)), ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            protein_goal,
            water_goal,
            catalog_path,
            config_file,
        })
    }

    /// Loads the configured workout catalog, or the bundled one.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, anything else as
    /// JSON.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        let Some(path) = &self.catalog_path.value else {
            return Catalog::bundled().map_err(ConfigError::BundledCatalog);
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.clone(), e))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let catalog = if is_yaml {
            let workouts: Vec<Workout> = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
            Catalog::new(workouts)
        } else {
            Catalog::from_json(&contents)
        };

        let catalog = catalog.map_err(|e| ConfigError::CatalogError(path.clone(), e))?;
        tracing::debug!(path = %path.display(), workouts = catalog.len(), "loaded workout catalog");
        Ok(catalog)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/healthcoach/
    /// - macOS: ~/Library/Application Support/healthcoach/
    /// - Windows: %APPDATA%/healthcoach/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("healthcoach")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/healthcoach/
    /// - macOS: ~/Library/Application Support/healthcoach/
    /// - Windows: %APPDATA%/healthcoach/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("healthcoach")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolves a path from the config file against the file's directory.
fn resolve_relative(config_path: &Path, value: PathBuf) -> PathBuf {
    if value.is_relative() {
        config_path.parent().map(|p| p.join(&value)).unwrap_or(value)
    } else {
        value
    }
}

fn parse_goal(name: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv(name.to_string(), value.to_string()))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(String, String),
    CatalogError(PathBuf, CatalogError),
    BundledCatalog(CatalogError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(name, value) => {
                write!(f, "Invalid value for {}: '{}' is not a whole number", name, value)
            }
            ConfigError::CatalogError(path, e) => {
                write!(f, "Invalid workout catalog '{}': {}", path.display(), e)
            }
            ConfigError::BundledCatalog(e) => {
                write!(f, "Bundled workout catalog is invalid: {}", e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        assert!(config
            .data_dir
            .value
            .to_string_lossy()
            .contains("healthcoach"));
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert_eq!(config.protein_goal.value, 150);
        assert_eq!(config.water_goal.value, 100);
        assert_eq!(config.catalog_path.value, None);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: /custom/coach").unwrap();
        writeln!(file, "protein_goal: 180").unwrap();

        let config = Config::load_with_env(Some(config_path.clone()), no_env).unwrap();
        assert_eq!(config.data_dir.value, PathBuf::from("/custom/coach"));
        assert_eq!(config.data_dir.source, ConfigSource::File);
        assert_eq!(config.protein_goal.value, 180);
        assert_eq!(config.protein_goal.source, ConfigSource::File);
        assert_eq!(config.water_goal.source, ConfigSource::Default);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: data").unwrap();
        writeln!(file, "catalog_path: plans/split.yaml").unwrap();

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        assert_eq!(config.data_dir.value, temp_dir.path().join("data"));
        assert_eq!(
            config.catalog_path.value,
            Some(temp_dir.path().join("plans/split.yaml"))
        );
    }

    #[test]
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "water_goal: 80").unwrap();

        let env: HashMap<&str, &str> =
            HashMap::from([("COACH_WATER_GOAL", "120"), ("COACH_DATA_DIR", "/tmp/coach")]);
        let config = Config::load_with_env(Some(config_path), |name| {
            env.get(name).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.water_goal.value, 120);
        assert_eq!(config.water_goal.source, ConfigSource::Environment);
        assert_eq!(config.data_dir.value, PathBuf::from("/tmp/coach"));
        assert_eq!(config.data_dir.source, ConfigSource::Environment);
    }

    #[test]
    fn test_invalid_env_goal() {
        let temp_dir = tempdir().unwrap();
        let result = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |name| {
            (name == "COACH_PROTEIN_GOAL").then(|| "lots".to_string())
        });

        let err = result.unwrap_err();
        assert!(err.to_string().contains("COACH_PROTEIN_GOAL"));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load_with_env(Some(config_path), no_env);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_bundled_catalog_by_default() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), no_env).unwrap();
        assert_eq!(config.load_catalog().unwrap().len(), 3);
    }

    #[test]
    fn test_yaml_catalog() {
        let temp_dir = tempdir().unwrap();
        let catalog_path = temp_dir.path().join("split.yaml");
        std::fs::write(
            &catalog_path,
            r#"
- day: Upper
  title: Push and Pull
  duration: 40 min
  calories: 300
  sections:
    - title: Main
      exercises:
        - id: up-1
          name: Bench Press
          sets: 4 sets
          reps: "8"
"#,
        )
        .unwrap();

        let config = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |name| {
            (name == "COACH_CATALOG_PATH").then(|| catalog_path.to_string_lossy().into_owned())
        })
        .unwrap();

        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().find_exercise("up-1").unwrap().name, "Bench Press");
    }

    #[test]
    fn test_invalid_catalog_file() {
        let temp_dir = tempdir().unwrap();
        let catalog_path = temp_dir.path().join("empty.json");
        std::fs::write(&catalog_path, "[]").unwrap();

        let config = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |name| {
            (name == "COACH_CATALOG_PATH").then(|| catalog_path.to_string_lossy().into_owned())
        })
        .unwrap();

        let err = config.load_catalog().unwrap_err();
        assert!(err.to_string().contains("Invalid workout catalog"));
    }
}
