//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use casement_core::{DispatchError, MenuError, RoutingError};

/// Errors that can occur while building or running a gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A menu key could not be registered.
    #[error("Menu error: {0}")]
    Menu(#[from] MenuError),

    /// The notification could not be routed.
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    /// The selected handler could not be run.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
