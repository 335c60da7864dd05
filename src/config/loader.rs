//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "kudos.toml";

/// Load configuration from kudos.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Reject configurations that would only fail later, per-request
fn validate(config: &Config) -> Result<()> {
    if config.session.secret.is_empty() {
        return Err(Error::MissingSessionSecret);
    }
    Ok(())
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Kudos Configuration

# "production" enables the Secure cookie attribute
environment = "development"

[server]
host = "0.0.0.0"
port = 3000

[session]
# Required. Absence is a fatal startup error.
secret = "${SESSION_SECRET}"
cookie_name = "kudos-session"
max_age_seconds = 2592000  # 30 days

[database]
host = "${DATABASE_HOST:-localhost}"
port = 5432
user = "${DATABASE_USER:-postgres}"
password = "${DATABASE_PASSWORD}"
dbname = "kudos"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_interpolation() {
        env::set_var("TEST_VAR", "hello");
        let content = "value = \"${TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_missing_session_secret_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[session]\nsecret = \"\"").unwrap();

        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(Error::MissingSessionSecret)));
    }

    #[test]
    fn test_load_config_with_secret() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[session]\nsecret = \"s3cret\"").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.session.secret, "s3cret");
        assert_eq!(config.session.cookie_name, "kudos-session");
        assert_eq!(config.session.max_age_seconds, 2_592_000);
        assert!(!config.secure_cookies());
    }
}
