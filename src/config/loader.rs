//! Configuration loader with TOML parsing and environment variable overrides

use super::client::ClientConfig;
use super::schema::RollcallConfig;
use super::secret::secret_string;
use crate::domain::errors::RollcallError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RollcallConfig
/// 4. Applies environment variable overrides (ROLLCALL_* prefix)
/// 5. Validates the configuration, including the client credentials
///
/// # Errors
///
/// Returns [`RollcallError::Configuration`] if the file cannot be read or
/// parsed, a referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use rollcall::config::loader::load_config;
///
/// let config = load_config("rollcall.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RollcallConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RollcallError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RollcallError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: RollcallConfig = toml::from_str(&contents)
        .map_err(|e| RollcallError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        RollcallError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    ClientConfig::from_config(&config)?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RollcallError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RollcallError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ROLLCALL_* prefix
///
/// Environment variables follow the pattern: ROLLCALL_<SECTION>_<KEY>
fn apply_env_overrides(config: &mut RollcallConfig) -> Result<()> {
    if let Ok(val) = std::env::var("ROLLCALL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("ROLLCALL_SERVICE_ADDRESS") {
        config.service.address = val;
    }
    if let Ok(val) = std::env::var("ROLLCALL_SERVICE_AUTH_STRATEGY") {
        config.service.auth_strategy = val.parse().map_err(RollcallError::Configuration)?;
    }
    if let Ok(val) = std::env::var("ROLLCALL_SERVICE_API_TOKEN") {
        config.service.api_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ROLLCALL_SERVICE_API_KEY") {
        config.service.api_key = Some(val);
    }
    if let Ok(val) = std::env::var("ROLLCALL_SERVICE_API_SECRET") {
        config.service.api_secret = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ROLLCALL_SERVICE_RETRY_MAX") {
        config.service.retry_max = parse_override("ROLLCALL_SERVICE_RETRY_MAX", &val)?;
    }

    if let Ok(val) = std::env::var("ROLLCALL_EXPORT_DEFAULT_EVENT_ID") {
        config.export.default_event_id =
            Some(parse_override("ROLLCALL_EXPORT_DEFAULT_EVENT_ID", &val)?);
    }
    if let Ok(val) = std::env::var("ROLLCALL_EXPORT_PAGE_SIZE") {
        config.export.page_size = parse_override("ROLLCALL_EXPORT_PAGE_SIZE", &val)?;
    }

    Ok(())
}

fn parse_override(name: &str, value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| {
        RollcallError::Configuration(format!("{name} must be an integer, got '{value}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Serializes tests touching process environment
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_substitute_env_vars() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("ROLLCALL_LOADER_TEST_SECRET", "s3cr3t");

        let input = "api_secret = \"${ROLLCALL_LOADER_TEST_SECRET}\"\n# ${NOT_SET_ANYWHERE}\n";
        let output = substitute_env_vars(input).unwrap();

        assert!(output.contains("api_secret = \"s3cr3t\""));
        assert!(output.contains("# ${NOT_SET_ANYWHERE}"));
        std::env::remove_var("ROLLCALL_LOADER_TEST_SECRET");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let result = substitute_env_vars("key = \"${ROLLCALL_DEFINITELY_MISSING_VAR}\"");

        let err = result.unwrap_err();
        assert!(err
            .to_string()
            .contains("ROLLCALL_DEFINITELY_MISSING_VAR"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/rollcall.toml");
        assert!(matches!(result, Err(RollcallError::Configuration(_))));
    }

    #[test]
    fn test_load_config_rejects_missing_credentials() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
address = "https://events.example.org"
auth_strategy = "api_key"
api_key = "key"
"#
        )
        .unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("api_secret"));
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(parse_override("X", " 5 ").unwrap(), 5);
        assert!(parse_override("X", "five").is_err());
    }
}
