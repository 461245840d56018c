//! Unified error types for Casement core.
//!
//! Routing distinguishes two tiers of failure:
//!
//! - **Hard failures** ([`RoutingError`]): a required top-level field is
//!   missing or the payload cannot be decoded at all. These reach the caller.
//! - **Soft failures**: optional nested structure (`ActionParam.scene.sceneId`)
//!   that is missing or malformed. These never become errors; the router maps
//!   them to a fallback variant.

use thiserror::Error;

use crate::variant::{HandlerKind, ReservedAction};

// =============================================================================
// Decode Errors
// =============================================================================

/// Errors produced by a [`ContentDecoder`](crate::decode::ContentDecoder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not well-formed in the decoder's format.
    #[error("malformed {format} content: {reason}")]
    Malformed {
        /// Format name of the decoder ("xml", "json").
        format: &'static str,
        /// Reason reported by the parser.
        reason: String,
    },

    /// The payload is well-formed but its top level is not a key/value mapping.
    #[error("{format} content is not a key/value mapping")]
    NotAMapping {
        /// Format name of the decoder.
        format: &'static str,
    },
}

impl DecodeError {
    /// Creates a malformed-content error.
    pub fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Routing Errors
// =============================================================================

/// Hard routing failures. Classification cannot proceed past any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The envelope carries no service name.
    #[error("missing service name")]
    MissingServiceName,

    /// The envelope carries no content.
    #[error("missing business content")]
    MissingContent,

    /// The content could not be decoded.
    #[error("failed to decode content: {0}")]
    DecodeFailure(#[from] DecodeError),

    /// The decoded content has no `MsgType`.
    #[error("missing message type")]
    MissingMessageType,

    /// An event message has no `EventType`.
    #[error("missing event type")]
    MissingEventType,
}

impl RoutingError {
    /// Returns the name of the missing field, if this error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingServiceName => Some(crate::constants::PARAM_SERVICE),
            Self::MissingContent => Some(crate::constants::PARAM_BIZ_CONTENT),
            Self::MissingMessageType => Some(crate::constants::FIELD_MSG_TYPE),
            Self::MissingEventType => Some(crate::constants::FIELD_EVENT_TYPE),
            Self::DecodeFailure(_) => None,
        }
    }
}

// =============================================================================
// Menu Errors
// =============================================================================

/// Errors from menu key registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    /// Menu keys cannot be empty.
    #[error("menu key cannot be empty")]
    EmptyKey,

    /// The key is reserved by the platform.
    #[error("menu key {0:?} is reserved by the platform")]
    Reserved(String),

    /// The bound handler name is empty.
    #[error("handler name for menu key {key:?} cannot be empty")]
    EmptyHandler {
        /// The menu key being registered.
        key: String,
    },
}

// =============================================================================
// Handler Errors
// =============================================================================

/// Error returned by an [`ActionHandler`](crate::handler::ActionHandler).
#[derive(Debug, Clone, Error)]
#[error("handler '{handler}' failed: {reason}")]
pub struct HandlerError {
    /// Name of the failing handler.
    pub handler: String,
    /// Reason for failure.
    pub reason: String,
}

impl HandlerError {
    /// Creates a handler error.
    pub fn new(handler: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from [`HandlerRegistry::dispatch`](crate::handler::HandlerRegistry::dispatch).
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// No handler is registered for the selected variant and no default exists.
    #[error("no handler registered for '{0}'")]
    NoHandler(HandlerKind),

    /// A platform-reserved action was selected and no handler implements it.
    #[error("reserved action '{0}' is not implemented")]
    NotImplemented(ReservedAction),

    /// The handler ran and failed.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for routing.
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Result type for menu registration.
pub type MenuResult<T> = Result<T, MenuError>;

/// Result type for dispatch.
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(RoutingError::MissingServiceName.field(), Some("service"));
        assert_eq!(RoutingError::MissingContent.field(), Some("biz_content"));
        assert_eq!(RoutingError::MissingMessageType.field(), Some("MsgType"));
        assert_eq!(RoutingError::MissingEventType.field(), Some("EventType"));
        let decode = RoutingError::from(DecodeError::NotAMapping { format: "json" });
        assert_eq!(decode.field(), None);
    }

    #[test]
    fn test_display() {
        let err = RoutingError::DecodeFailure(DecodeError::malformed("xml", "unexpected eof"));
        assert_eq!(
            err.to_string(),
            "failed to decode content: malformed xml content: unexpected eof"
        );
        assert_eq!(
            MenuError::Reserved("delete".into()).to_string(),
            "menu key \"delete\" is reserved by the platform"
        );
    }
}
