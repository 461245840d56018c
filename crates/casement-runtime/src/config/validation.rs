//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{CasementConfig, GatewayConfig, LogOutput, LoggingConfig};
use crate::logging::filter_directive;
use casement_core::menu::is_reserved;

/// Maximum length of a menu key.
const MAX_MENU_KEY_LEN: usize = 64;

/// Validates the entire configuration.
pub fn validate_config(config: &CasementConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_gateway_config(&config.gateway)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    for (target, level) in &logging.filters {
        let invalid = target.is_empty()
            || target.contains(char::is_whitespace)
            || filter_directive(target, *level).is_err();
        if invalid {
            return Err(ConfigError::validation(format!(
                "Invalid log filter target: {target:?}"
            )));
        }
    }

    Ok(())
}

/// Validates routing settings.
pub fn validate_gateway_config(gateway: &GatewayConfig) -> ConfigResult<()> {
    for (key, handler) in &gateway.menus {
        validate_menu_key(key)?;
        if handler.is_empty() {
            return Err(ConfigError::missing_field(format!("gateway.menus.{key}")));
        }
    }
    Ok(())
}

/// Validates a menu key.
///
/// The platform accepts keys that are not reserved and contain no special
/// characters.
fn validate_menu_key(key: &str) -> ConfigResult<()> {
    if key.is_empty() {
        return Err(ConfigError::invalid_menu_key(key, "key cannot be empty"));
    }

    if key.len() > MAX_MENU_KEY_LEN {
        return Err(ConfigError::invalid_menu_key(
            key,
            format!("key exceeds {MAX_MENU_KEY_LEN} characters"),
        ));
    }

    if is_reserved(key) {
        return Err(ConfigError::invalid_menu_key(key, "key is reserved by the platform"));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::invalid_menu_key(
            key,
            "only ASCII letters, digits, '_' and '-' are allowed",
        ));
    }

    Ok(())
}
