//! Notification router.
//!
//! The [`Router`] classifies one inbound envelope and returns the
//! [`HandlerVariant`] responsible for it. Classification runs in fixed order:
//!
//! 1. Validate that the service name and content are present
//! 2. Decode the content
//! 3. Walk the decision levels in [`levels`], each one either selecting a
//!    variant or handing off to the next
//!
//! Routing is a pure function of the envelope and the current menu table. The
//! router holds no mutable state, never blocks on I/O, and can be cloned and
//! shared freely across threads.
//!
//! ```rust,ignore
//! use casement_core::{JsonDecoder, MenuRegistry, Router};
//!
//! let menus = MenuRegistry::new().with("async_image_text", "async_msg_send")?;
//! let router = Router::new(JsonDecoder, menus);
//!
//! let variant = router.route(
//!     "alipay.mobile.public.message.notify",
//!     r#"{"MsgType":"event","EventType":"follow"}"#,
//! )?;
//! assert_eq!(variant.kind(), HandlerKind::Follow);
//! ```

pub mod levels;

use std::sync::Arc;

use tracing::{Level, debug, span, trace};

use crate::constants::{FIELD_ACTION_PARAM, FIELD_EVENT_TYPE, FIELD_MSG_TYPE};
use crate::content::DecodedContent;
use crate::decode::ContentDecoder;
use crate::envelope::{InboundEnvelope, validate_parts};
use crate::error::{RoutingError, RoutingResult};
use crate::menu::MenuLookup;
use crate::variant::HandlerVariant;

use levels::{ClickRoute, EnterRoute, EventRoute, MessageRoute, NotifyRoute};

/// Classifies inbound notifications.
///
/// # Thread Safety
///
/// `Router` is `Send + Sync`; clones share the decoder and menu table.
#[derive(Clone)]
pub struct Router {
    decoder: Arc<dyn ContentDecoder>,
    menus: Arc<dyn MenuLookup>,
}

impl Router {
    /// Creates a router with the given decoder and menu table.
    pub fn new<D, M>(decoder: D, menus: M) -> Self
    where
        D: ContentDecoder + 'static,
        M: MenuLookup + 'static,
    {
        Self::from_parts(Arc::new(decoder), Arc::new(menus))
    }

    /// Creates a router from shared parts.
    pub fn from_parts(decoder: Arc<dyn ContentDecoder>, menus: Arc<dyn MenuLookup>) -> Self {
        Self { decoder, menus }
    }

    /// Returns the decoder used by this router.
    pub fn decoder(&self) -> &dyn ContentDecoder {
        &*self.decoder
    }

    /// Routes a notification.
    ///
    /// Fails with `MissingServiceName` or `MissingContent` before decoding if
    /// either input is empty.
    pub fn route(&self, service_name: &str, raw_content: &str) -> RoutingResult<HandlerVariant> {
        let span = span!(Level::DEBUG, "route", service = %service_name);
        let _enter = span.enter();

        validate_parts(service_name, raw_content)?;
        let content = self.decoder.decode(raw_content)?;
        let variant = self.classify(service_name, content)?;

        debug!(kind = %variant.kind(), "Notification routed");
        Ok(variant)
    }

    /// Routes an envelope.
    pub fn route_envelope(&self, envelope: &InboundEnvelope) -> RoutingResult<HandlerVariant> {
        self.route(&envelope.service_name, &envelope.raw_content)
    }

    /// Classifies already-decoded content, skipping validation and decoding.
    pub fn classify(
        &self,
        service_name: &str,
        content: DecodedContent,
    ) -> RoutingResult<HandlerVariant> {
        let msg_type = content
            .get_str(FIELD_MSG_TYPE)
            .ok_or(RoutingError::MissingMessageType)?;
        let route = levels::message_route(msg_type);
        trace!(msg_type = %msg_type, ?route, "Message kind classified");

        match route {
            MessageRoute::TextChat => Ok(HandlerVariant::TextChat { content }),
            MessageRoute::Event => self.classify_event(service_name, content),
            MessageRoute::DefaultAck => Ok(HandlerVariant::DefaultAck { content }),
        }
    }

    fn classify_event(
        &self,
        service_name: &str,
        content: DecodedContent,
    ) -> RoutingResult<HandlerVariant> {
        let event_type = content
            .get_str(FIELD_EVENT_TYPE)
            .ok_or(RoutingError::MissingEventType)?;

        match levels::event_route(service_name, event_type) {
            EventRoute::Verification => Ok(HandlerVariant::Verification),
            EventRoute::Notify => {
                let route = levels::notify_route(event_type);
                trace!(event_type = %event_type, ?route, "Notify event classified");
                self.classify_notify(route, content)
            }
            EventRoute::DefaultAck => {
                debug!(
                    event_type = %event_type,
                    "No event routing for service, acknowledging"
                );
                Ok(HandlerVariant::DefaultAck { content })
            }
        }
    }

    fn classify_notify(
        &self,
        route: NotifyRoute,
        content: DecodedContent,
    ) -> RoutingResult<HandlerVariant> {
        Ok(match route {
            NotifyRoute::Follow => HandlerVariant::Follow { content },
            NotifyRoute::Unfollow => HandlerVariant::Unfollow { content },
            NotifyRoute::Click => self.classify_click(content),
            NotifyRoute::Enter => match levels::enter_route(&content) {
                EnterRoute::CustomScene => HandlerVariant::CustomSceneEnter { content },
                EnterRoute::Plain => {
                    trace!("No usable scene id, treating as plain enter");
                    HandlerVariant::PlainEnter { content }
                }
            },
            NotifyRoute::DefaultAck => HandlerVariant::DefaultAck { content },
        })
    }

    fn classify_click(&self, content: DecodedContent) -> HandlerVariant {
        let key = content
            .get_str(FIELD_ACTION_PARAM)
            .unwrap_or_default()
            .to_owned();

        match levels::click_route(&key) {
            ClickRoute::Reserved(action) => HandlerVariant::NotImplemented { action },
            ClickRoute::Menu => match self.menus.resolve(&key) {
                Some(handler) => HandlerVariant::CustomMenuAction {
                    key,
                    handler,
                    content,
                },
                None => {
                    trace!(key = %key, "Menu key not registered");
                    HandlerVariant::Unmapped { key, content }
                }
            },
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("format", &self.decoder.format_name())
            .finish()
    }
}
