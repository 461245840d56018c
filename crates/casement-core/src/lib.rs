//! # Casement Core
//!
//! Classification of inbound service-window notifications.
//!
//! The platform posts every notification as an envelope of a service name and
//! an opaque `biz_content` blob. This crate decodes the blob and walks its
//! discriminator fields to select the handler responsible for it:
//!
//! ```text
//! ┌──────────────┐   ┌─────────┐   ┌────────┐   ┌────────────────┐   ┌─────────────────┐
//! │   Envelope   │──▶│ Decoder │──▶│ Router │──▶│ HandlerVariant │──▶│ HandlerRegistry │
//! │ service+blob │   │ xml/json│   │ levels │   │  (uninvoked)   │   │  (caller side)  │
//! └──────────────┘   └─────────┘   └────────┘   └────────────────┘   └─────────────────┘
//!                                      ▲
//!                                      │ MenuLookup
//!                                 ┌──────────────┐
//!                                 │ MenuRegistry │
//!                                 └──────────────┘
//! ```
//!
//! Missing top-level fields and undecodable content are hard errors
//! ([`RoutingError`]). Unknown discriminator values are acknowledged
//! ([`HandlerVariant::DefaultAck`]) and malformed optional structure falls back
//! to the nearest plain variant.
//!
//! ## Example
//!
//! ```rust,ignore
//! use casement_core::{HandlerKind, MenuRegistry, Router, XmlDecoder};
//!
//! let menus = MenuRegistry::new().with("async_image_text", "async_msg_send")?;
//! let router = Router::new(XmlDecoder, menus);
//!
//! let variant = router.route(
//!     "alipay.mobile.public.message.notify",
//!     "<XML><MsgType>event</MsgType><EventType>follow</EventType></XML>",
//! )?;
//! assert_eq!(variant.kind(), HandlerKind::Follow);
//! ```

pub mod constants;
pub mod content;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod menu;
pub mod router;
pub mod variant;

pub use content::DecodedContent;
#[cfg(feature = "xml")]
pub use decode::XmlDecoder;
pub use decode::{ContentDecoder, ContentFormat, JsonDecoder, decoder_for};
pub use envelope::InboundEnvelope;
pub use error::{
    DecodeError, DecodeResult, DispatchError, DispatchResult, HandlerError, MenuError, MenuResult,
    RoutingError, RoutingResult,
};
pub use handler::{
    AckHandler, ActionHandler, BoxedActionHandler, FnHandler, HandlerRegistry, HandlerResponse,
};
pub use menu::{MenuLookup, MenuRegistry};
pub use router::Router;
pub use variant::{HandlerKind, HandlerVariant, ReservedAction};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        ActionHandler, ContentDecoder, DecodedContent, HandlerKind, HandlerRegistry,
        HandlerResponse, HandlerVariant, InboundEnvelope, MenuRegistry, Router, RoutingError,
    };
}
