//! Casement Runtime - configuration, logging and gateway wiring.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`)
//! - Logging initialization (`init_from_config`)
//! - A ready-to-use notification gateway (`Gateway`)
//!
//! # Quick Start
//!
//! ```ignore
//! use casement_runtime::{Gateway, config::load_config};
//! use casement_core::{FnHandler, HandlerKind, HandlerResponse};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config()?;
//!     let mut gateway = Gateway::bootstrap(&config)?;
//!
//!     gateway.handlers_mut().register(
//!         HandlerKind::Follow,
//!         FnHandler::new("welcome", |_| Ok(HandlerResponse::Body("welcome".into()))),
//!     );
//!
//!     // Hand `gateway.process(&form_params)` to your HTTP endpoint.
//!     Ok(())
//! }
//! ```
//!
//! # Menu Keys
//!
//! Menu keys come from the `[gateway.menus]` table and can be added while
//! the gateway is serving:
//!
//! ```ignore
//! gateway.menus().register("weekly_news", "news_digest")?;
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;

// Re-exports
pub use config::{CasementConfig, ConfigError, ConfigLoader, ConfigResult, GatewayConfig};
pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use logging::init_from_config;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
