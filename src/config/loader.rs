//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::CounterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `store.table_name`.
pub const TABLE_NAME_ENV: &str = "TABLE_NAME";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<CounterConfig, ConfigError> {
    let config: CounterConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CounterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Resolve the service configuration: file (or defaults), then environment, then validation.
pub fn resolve_config(path: Option<&Path>) -> Result<CounterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => CounterConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut CounterConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(table) = lookup(TABLE_NAME_ENV).filter(|v| !v.is_empty()) {
        config.store.table_name = table;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DEFAULT_TABLE_NAME;

    #[test]
    fn test_env_overrides_table_name() {
        let mut config = CounterConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == TABLE_NAME_ENV).then(|| "StagingVisitors".to_string())
        });
        assert_eq!(config.store.table_name, "StagingVisitors");
    }

    #[test]
    fn test_empty_env_keeps_default() {
        let mut config = CounterConfig::default();
        apply_env_overrides(&mut config, |_| Some(String::new()));
        assert_eq!(config.store.table_name, DEFAULT_TABLE_NAME);
    }

    #[test]
    fn test_parse_reports_validation_errors() {
        let err = parse_config(
            r#"
            [store]
            table_name = ""
            scan_page_size = 0
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        assert!(matches!(parse_config("[store"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_example_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("visitor-counter.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config.store.backend, crate::config::schema::StoreBackend::File);
        assert_eq!(config.store.table_name, DEFAULT_TABLE_NAME);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/visitor-counter.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
