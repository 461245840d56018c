//! Handler execution for routed notifications.
//!
//! Routing only *selects* a [`HandlerVariant`]. The [`HandlerRegistry`] is the
//! caller-side table that maps each [`HandlerKind`] to an [`ActionHandler`] and
//! invokes it:
//!
//! ```rust,ignore
//! use casement_core::{AckHandler, HandlerKind, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register(HandlerKind::DefaultAck, AckHandler);
//! registry.register(HandlerKind::Follow, FollowHandler::new(client));
//! registry.register_menu("async_msg_send", AsyncMsgSendHandler::new(client));
//!
//! let variant = router.route(service, biz_content)?;
//! let response = registry.dispatch(&variant).await?;
//! ```
//!
//! # Resolution order
//!
//! 1. `CustomMenuAction` looks up its bound handler name first
//! 2. Every variant then looks up its own kind
//! 3. Everything except `NotImplemented` falls back to the `DefaultAck` handler
//!
//! A reserved platform action is never silently acknowledged: without an
//! explicit `NotImplemented` handler, dispatch fails with
//! [`DispatchError::NotImplemented`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{DispatchError, DispatchResult, HandlerError};
use crate::variant::{HandlerKind, HandlerVariant};

/// What a handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Acknowledge the notification with no further content.
    Ack,
    /// Response body to return to the platform (before signing).
    Body(String),
}

/// Business logic behind a handler variant.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Executes the handler for a routed notification.
    async fn execute(&self, variant: &HandlerVariant) -> Result<HandlerResponse, HandlerError>;
}

/// A shared, type-erased handler.
pub type BoxedActionHandler = Arc<dyn ActionHandler>;

/// Handler that acknowledges every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct AckHandler;

#[async_trait]
impl ActionHandler for AckHandler {
    fn name(&self) -> &str {
        "ack"
    }

    async fn execute(&self, _variant: &HandlerVariant) -> Result<HandlerResponse, HandlerError> {
        Ok(HandlerResponse::Ack)
    }
}

/// Handler built from a synchronous closure.
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&HandlerVariant) -> Result<HandlerResponse, HandlerError> + Send + Sync,
{
    /// Wraps `f` under `name`.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> ActionHandler for FnHandler<F>
where
    F: Fn(&HandlerVariant) -> Result<HandlerResponse, HandlerError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, variant: &HandlerVariant) -> Result<HandlerResponse, HandlerError> {
        (self.f)(variant)
    }
}

/// Maps handler kinds, and menu handler names, to executable handlers.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    by_kind: HashMap<HandlerKind, BoxedActionHandler>,
    by_menu: HashMap<String, BoxedActionHandler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for `kind`, replacing any previous one.
    pub fn register<H>(&mut self, kind: HandlerKind, handler: H)
    where
        H: ActionHandler + 'static,
    {
        self.register_boxed(kind, Arc::new(handler));
    }

    /// Registers a pre-built shared handler for `kind`.
    pub fn register_boxed(&mut self, kind: HandlerKind, handler: BoxedActionHandler) {
        debug!(kind = %kind, handler = handler.name(), "Registered handler");
        self.by_kind.insert(kind, handler);
    }

    /// Registers the handler for `kind` (builder pattern).
    pub fn with<H>(mut self, kind: HandlerKind, handler: H) -> Self
    where
        H: ActionHandler + 'static,
    {
        self.register(kind, handler);
        self
    }

    /// Registers the handler for a menu handler name.
    ///
    /// The name is the one bound to a menu key in the
    /// [`MenuRegistry`](crate::menu::MenuRegistry).
    pub fn register_menu<H>(&mut self, handler_name: impl Into<String>, handler: H)
    where
        H: ActionHandler + 'static,
    {
        let handler_name = handler_name.into();
        debug!(menu_handler = %handler_name, handler = handler.name(), "Registered menu handler");
        self.by_menu.insert(handler_name, Arc::new(handler));
    }

    /// Returns `true` if a handler is registered for `kind`.
    pub fn contains(&self, kind: HandlerKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// Returns the kinds that have no handler registered.
    pub fn missing_kinds(&self) -> Vec<HandlerKind> {
        HandlerKind::ALL
            .into_iter()
            .filter(|kind| !self.by_kind.contains_key(kind))
            .collect()
    }

    /// Finds the handler for `variant`.
    pub fn resolve(&self, variant: &HandlerVariant) -> Option<&BoxedActionHandler> {
        let kind = variant.kind();

        if let HandlerVariant::CustomMenuAction { handler, .. } = variant {
            if let Some(h) = self.by_menu.get(handler) {
                return Some(h);
            }
        }

        let own = self.by_kind.get(&kind);
        if kind == HandlerKind::NotImplemented {
            return own;
        }
        own.or_else(|| self.by_kind.get(&HandlerKind::DefaultAck))
    }

    /// Executes the handler for `variant`.
    pub async fn dispatch(&self, variant: &HandlerVariant) -> DispatchResult<HandlerResponse> {
        let Some(handler) = self.resolve(variant) else {
            return Err(match variant {
                HandlerVariant::NotImplemented { action } => DispatchError::NotImplemented(*action),
                other => DispatchError::NoHandler(other.kind()),
            });
        };

        debug!(kind = %variant.kind(), handler = handler.name(), "Dispatching to handler");
        Ok(handler.execute(variant).await?)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kind_count", &self.by_kind.len())
            .field("menu_count", &self.by_menu.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DecodedContent;
    use crate::variant::ReservedAction;

    fn named(name: &'static str) -> impl ActionHandler {
        FnHandler::new(name, move |_| Ok(HandlerResponse::Body(name.to_string())))
    }

    fn follow() -> HandlerVariant {
        HandlerVariant::Follow {
            content: DecodedContent::default(),
        }
    }

    fn menu_action(handler: &str) -> HandlerVariant {
        HandlerVariant::CustomMenuAction {
            key: "async_image_text".into(),
            handler: handler.into(),
            content: DecodedContent::default(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_kind() {
        let registry = HandlerRegistry::new().with(HandlerKind::Follow, named("follow"));
        assert_eq!(
            registry.dispatch(&follow()).await.unwrap(),
            HandlerResponse::Body("follow".into())
        );
    }

    #[tokio::test]
    async fn test_fallback_to_default_ack() {
        let registry = HandlerRegistry::new().with(HandlerKind::DefaultAck, AckHandler);
        assert_eq!(registry.dispatch(&follow()).await.unwrap(), HandlerResponse::Ack);
        assert_eq!(
            registry.dispatch(&HandlerVariant::Verification).await.unwrap(),
            HandlerResponse::Ack
        );
    }

    #[tokio::test]
    async fn test_no_handler() {
        let registry = HandlerRegistry::new();
        assert!(matches!(
            registry.dispatch(&follow()).await,
            Err(DispatchError::NoHandler(HandlerKind::Follow))
        ));
    }

    #[tokio::test]
    async fn test_not_implemented_never_falls_back() {
        let reserved = HandlerVariant::NotImplemented {
            action: ReservedAction::Authentication,
        };
        let mut registry = HandlerRegistry::new().with(HandlerKind::DefaultAck, AckHandler);
        assert!(matches!(
            registry.dispatch(&reserved).await,
            Err(DispatchError::NotImplemented(ReservedAction::Authentication))
        ));

        registry.register(HandlerKind::NotImplemented, named("bind"));
        assert_eq!(
            registry.dispatch(&reserved).await.unwrap(),
            HandlerResponse::Body("bind".into())
        );
    }

    #[tokio::test]
    async fn test_menu_handler_takes_precedence() {
        let mut registry = HandlerRegistry::new()
            .with(HandlerKind::CustomMenuAction, named("generic_menu"));
        registry.register_menu("async_msg_send", named("async_msg_send"));

        assert_eq!(
            registry.dispatch(&menu_action("async_msg_send")).await.unwrap(),
            HandlerResponse::Body("async_msg_send".into())
        );
        assert_eq!(
            registry.dispatch(&menu_action("other")).await.unwrap(),
            HandlerResponse::Body("generic_menu".into())
        );
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let registry = HandlerRegistry::new().with(
            HandlerKind::Follow,
            FnHandler::new("failing", |_| Err(HandlerError::new("failing", "boom"))),
        );
        let err = registry.dispatch(&follow()).await.unwrap_err();
        assert_eq!(err.to_string(), "handler 'failing' failed: boom");
    }

    #[test]
    fn test_missing_kinds() {
        let registry = HandlerRegistry::new().with(HandlerKind::DefaultAck, AckHandler);
        let missing = registry.missing_kinds();
        assert_eq!(missing.len(), HandlerKind::ALL.len() - 1);
        assert!(!missing.contains(&HandlerKind::DefaultAck));
    }
}
