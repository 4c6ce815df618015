//! Input validation for environment names and configuration keys.
//!
//! Environment names become file names inside the checkpoint directory, so
//! they are restricted to characters that cannot escape that directory or be
//! mistaken for a file extension.

use crate::error::{Error, Result};

/// Maximum allowed length for environment names.
pub const MAX_NAME_LENGTH: usize = 128;

/// Reserved names that cannot be used as environment names (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates that an environment name is safe to map onto a file path.
///
/// A name is valid if:
/// - It is not empty
/// - It is no longer than MAX_NAME_LENGTH characters
/// - It contains only alphanumeric characters, dashes, and underscores
/// - It does not use reserved system names
///
/// # Examples
///
/// ```
/// use waypoint::validation::validate_env_name;
///
/// assert!(validate_env_name("production").is_ok());
/// assert!(validate_env_name("eu_west-2").is_ok());
/// assert!(validate_env_name("").is_err());
/// assert!(validate_env_name("prod.json").is_err());
/// ```
pub fn validate_env_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument(
            "environment name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(Error::InvalidArgument(format!(
            "environment name too long: {} characters (max {MAX_NAME_LENGTH})",
            name.len()
        )));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        return Err(Error::InvalidArgument(format!(
            "environment name '{name}' contains invalid characters. Use only alphanumeric characters, dashes (-), and underscores (_)"
        )));
    }

    if RESERVED_NAMES.contains(&name.to_lowercase().as_str()) {
        return Err(Error::InvalidArgument(format!(
            "environment name '{name}' uses a reserved name"
        )));
    }

    Ok(())
}

/// Validates a configuration key: non-empty, no whitespace.
pub fn validate_config_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidArgument(
            "config key cannot be empty".to_string(),
        ));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(Error::InvalidArgument(format!(
            "config key '{key}' cannot contain whitespace"
        )));
    }
    Ok(())
}

/// Clap value parser for validating environment name arguments.
pub fn clap_env_name_validator(s: &str) -> Result<String, String> {
    validate_env_name(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_validate_env_name_valid() {
        assert!(validate_env_name("prod").is_ok());
        assert!(validate_env_name("staging-2").is_ok());
        assert!(validate_env_name("us_east_1").is_ok());
        assert!(validate_env_name("a").is_ok());
    }

    #[test]
    fn test_validate_env_name_empty() {
        let err = validate_env_name("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_env_name_too_long() {
        let long_name = "a".repeat(MAX_NAME_LENGTH + 1);
        let err = validate_env_name(&long_name).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn test_validate_env_name_invalid_chars() {
        assert!(validate_env_name("prod/eu").is_err());
        assert!(validate_env_name("../prod").is_err());
        assert!(validate_env_name("prod env").is_err());
        assert!(validate_env_name("prod.yaml").is_err());
    }

    #[test]
    fn test_validate_env_name_reserved() {
        assert!(validate_env_name("CON").is_err());
        assert!(validate_env_name("nul").is_err());
    }

    #[test]
    fn test_validate_config_key() {
        assert!(validate_config_key("aws:region").is_ok());
        assert!(validate_config_key("").is_err());
        assert!(validate_config_key("aws region").is_err());
    }

    #[test]
    fn test_clap_validator() {
        assert!(clap_env_name_validator("prod").is_ok());
        assert!(clap_env_name_validator("../prod").is_err());
    }
}
