//! Configuration module for the Casement runtime.
//!
//! Layered loading (defaults, files, `CASEMENT_*` environment variables) and
//! validation of logging and routing settings.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    CasementConfig, GatewayConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig,
    SpanEventConfig,
};
pub use validation::{validate_config, validate_gateway_config};
