//! Handler variants: the possible outcomes of routing.
//!
//! A [`HandlerVariant`] names the business handler responsible for a
//! notification and carries the decoded content it will need. Building one has
//! no side effects; executing it is the caller's job (see
//! [`HandlerRegistry`](crate::handler::HandlerRegistry)).
//!
//! # Variant table
//!
//! | Variant            | Selected when                                        | Payload        |
//! |--------------------|------------------------------------------------------|----------------|
//! | `TextChat`         | `MsgType = text`                                     | content        |
//! | `Verification`     | check service + `verifygw`                           | none           |
//! | `Follow`           | notify service + `follow`                            | content        |
//! | `Unfollow`         | notify service + `unfollow`                          | content        |
//! | `CustomSceneEnter` | notify service + `enter` with a `sceneId`            | content        |
//! | `PlainEnter`       | notify service + `enter` without a usable `sceneId`  | content        |
//! | `CustomMenuAction` | notify service + `click` on a registered menu key    | key + content  |
//! | `NotImplemented`   | notify service + `click` on a reserved action        | reserved action|
//! | `Unmapped`         | notify service + `click` on an unregistered key      | key + content  |
//! | `DefaultAck`       | any unrecognized kind, event or service              | content        |

use serde::{Deserialize, Serialize};

use crate::constants::{ACTION_AUTHENTICATION, ACTION_DELETE};
use crate::content::DecodedContent;

/// Platform-reserved click actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedAction {
    /// Bind a developer member account.
    Authentication,
    /// Remove a developer member account binding.
    Delete,
}

impl ReservedAction {
    /// Returns the `ActionParam` value the platform sends for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => ACTION_AUTHENTICATION,
            Self::Delete => ACTION_DELETE,
        }
    }

    /// Parses an `ActionParam` value.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            ACTION_AUTHENTICATION => Some(Self::Authentication),
            ACTION_DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReservedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag of a [`HandlerVariant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    TextChat,
    Verification,
    Follow,
    Unfollow,
    CustomSceneEnter,
    PlainEnter,
    CustomMenuAction,
    NotImplemented,
    Unmapped,
    DefaultAck,
}

impl HandlerKind {
    /// Every kind, in declaration order.
    pub const ALL: [HandlerKind; 10] = [
        Self::TextChat,
        Self::Verification,
        Self::Follow,
        Self::Unfollow,
        Self::CustomSceneEnter,
        Self::PlainEnter,
        Self::CustomMenuAction,
        Self::NotImplemented,
        Self::Unmapped,
        Self::DefaultAck,
    ];

    /// Returns the snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextChat => "text_chat",
            Self::Verification => "verification",
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
            Self::CustomSceneEnter => "custom_scene_enter",
            Self::PlainEnter => "plain_enter",
            Self::CustomMenuAction => "custom_menu_action",
            Self::NotImplemented => "not_implemented",
            Self::Unmapped => "unmapped",
            Self::DefaultAck => "default_ack",
        }
    }
}

impl std::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The handler selected for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerVariant {
    /// Plain text chat message.
    TextChat { content: DecodedContent },

    /// Developer gateway verification.
    Verification,

    /// User followed the service window.
    Follow { content: DecodedContent },

    /// User unfollowed the service window.
    Unfollow { content: DecodedContent },

    /// User entered through a custom QR-code scene.
    CustomSceneEnter { content: DecodedContent },

    /// User entered without a scene.
    PlainEnter { content: DecodedContent },

    /// Click on an integrator-registered menu key.
    CustomMenuAction {
        /// The clicked menu key.
        key: String,
        /// Handler name bound to the key.
        handler: String,
        content: DecodedContent,
    },

    /// Click on a platform-reserved action that the integrator must implement.
    NotImplemented { action: ReservedAction },

    /// Click on a menu key with no registered handler.
    Unmapped {
        /// The clicked menu key.
        key: String,
        content: DecodedContent,
    },

    /// Acknowledge without action.
    DefaultAck { content: DecodedContent },
}

impl HandlerVariant {
    /// Returns the tag of this variant.
    pub fn kind(&self) -> HandlerKind {
        match self {
            Self::TextChat { .. } => HandlerKind::TextChat,
            Self::Verification => HandlerKind::Verification,
            Self::Follow { .. } => HandlerKind::Follow,
            Self::Unfollow { .. } => HandlerKind::Unfollow,
            Self::CustomSceneEnter { .. } => HandlerKind::CustomSceneEnter,
            Self::PlainEnter { .. } => HandlerKind::PlainEnter,
            Self::CustomMenuAction { .. } => HandlerKind::CustomMenuAction,
            Self::NotImplemented { .. } => HandlerKind::NotImplemented,
            Self::Unmapped { .. } => HandlerKind::Unmapped,
            Self::DefaultAck { .. } => HandlerKind::DefaultAck,
        }
    }

    /// Returns the decoded content carried by this variant, if any.
    pub fn content(&self) -> Option<&DecodedContent> {
        match self {
            Self::TextChat { content }
            | Self::Follow { content }
            | Self::Unfollow { content }
            | Self::CustomSceneEnter { content }
            | Self::PlainEnter { content }
            | Self::CustomMenuAction { content, .. }
            | Self::Unmapped { content, .. }
            | Self::DefaultAck { content } => Some(content),
            Self::Verification | Self::NotImplemented { .. } => None,
        }
    }

    /// Consumes the variant and returns its decoded content, if any.
    pub fn into_content(self) -> Option<DecodedContent> {
        match self {
            Self::TextChat { content }
            | Self::Follow { content }
            | Self::Unfollow { content }
            | Self::CustomSceneEnter { content }
            | Self::PlainEnter { content }
            | Self::CustomMenuAction { content, .. }
            | Self::Unmapped { content, .. }
            | Self::DefaultAck { content } => Some(content),
            Self::Verification | Self::NotImplemented { .. } => None,
        }
    }

    /// Returns the menu key for click variants.
    pub fn menu_key(&self) -> Option<&str> {
        match self {
            Self::CustomMenuAction { key, .. } | Self::Unmapped { key, .. } => Some(key),
            Self::NotImplemented { action } => Some(action.as_str()),
            _ => None,
        }
    }
}
