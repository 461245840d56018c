//! # Casement
//!
//! Notification routing for Alipay service-window gateways.
//!
//! ## Overview
//!
//! The platform posts every user interaction with a service window (a text
//! message, a follow, a menu click, a scan-to-enter) to a single gateway
//! endpoint. Casement decodes the notification and decides, in four levels,
//! which handler owns it:
//!
//! ```text
//! Level 1  MsgType      text ──────────────────────────────▶ TextChat
//!                       event ─┐
//! Level 2  service+Event       ├─ check    + verifygw ─────▶ Verification
//!                              └─ notify   ─┐
//! Level 3  EventType                        ├─ follow ─────▶ Follow
//!                                           ├─ unfollow ───▶ Unfollow
//!                                           ├─ enter ──────▶ CustomSceneEnter / PlainEnter
//!                                           └─ click ─┐
//! Level 4  ActionParam                                ├─ reserved ──▶ NotImplemented
//!                                                     ├─ menu key ──▶ CustomMenuAction
//!                                                     └─ other ─────▶ Unmapped
//! ```
//!
//! Anything else is acknowledged with `DefaultAck`.
//!
//! - **Core**: decoders, the router, menu keys and handler registry
//! - **Runtime**: configuration, logging and the [`Gateway`](runtime::Gateway)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use casement::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config()?;
//!     let mut gateway = Gateway::bootstrap(&config)?;
//!     gateway.menus().register("weekly_news", "news_digest")?;
//!
//!     let response = gateway.process(&form_params).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `xml`: XML `biz_content` decoding (default)
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use casement_core as core;
pub use casement_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use casement::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use casement_runtime::config::{CasementConfig, ConfigLoader, load_config};
    pub use casement_runtime::{Gateway, GatewayError};

    // Routing
    pub use casement_core::prelude::*;

    // Handlers
    pub use casement_core::{AckHandler, FnHandler, HandlerError};
}
