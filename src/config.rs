const DEFAULT_LOG_FILE_PATH: &str = "logs/swiss.log";
const DEFAULT_LOG_ARCHIVE_PATTERN: &str = "logs/swiss.{}.log";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file. The in-memory repositories are used when unset.
    pub db_path: Option<String>,
    pub log_file_path: String,
    pub log_archive_pattern: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            db_path: non_empty("SWISS_DB"),
            log_file_path: non_empty("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            log_archive_pattern: non_empty("LOG_ARCHIVE_PATTERN")
                .unwrap_or_else(|| DEFAULT_LOG_ARCHIVE_PATTERN.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.db_path, None);
        assert_eq!(config.log_file_path, "logs/swiss.log");
        assert_eq!(config.log_archive_pattern, "logs/swiss.{}.log");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SWISS_DB", "data/swiss.db"),
            ("LOG_FILE_PATH", "/var/log/swiss.log"),
            ("LOG_ARCHIVE_PATTERN", "/var/log/swiss.{}.log.gz"),
        ]);
        assert_eq!(config.db_path.as_deref(), Some("data/swiss.db"));
        assert_eq!(config.log_file_path, "/var/log/swiss.log");
        assert_eq!(config.log_archive_pattern, "/var/log/swiss.{}.log.gz");
    }

    #[test]
    fn test_blank_db_path_means_memory() {
        assert_eq!(config_from(&[("SWISS_DB", "  ")]).db_path, None);
    }
}
