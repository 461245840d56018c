//! Decision tables for each routing level.
//!
//! Every level is an ordered list of rules. The first rule whose predicate
//! holds decides the level's outcome; if none holds, the level's fallback
//! applies. Outcomes are small per-level enums that the router matches
//! exhaustively, so a new outcome cannot be added without handling it.
//!
//! ```text
//! Level 1  MsgType          text → TextChat | event → Level 2 | * → DefaultAck
//! Level 2  service+event    check+verifygw → Verification | notify → Level 3 | * → DefaultAck
//! Level 3  EventType        follow | unfollow | click → 4a | enter → 4b | * → DefaultAck
//! Level 4a ActionParam      authentication | delete → NotImplemented | * → menu table
//! Level 4b scene.sceneId    non-empty → CustomSceneEnter | * → PlainEnter
//! ```

use serde_json::Value;

use crate::constants::*;
use crate::content::{DecodedContent, non_empty_str};
use crate::variant::ReservedAction;

/// A decision-table row matching one discriminator exactly.
#[derive(Debug, Clone, Copy)]
pub struct Rule<R> {
    /// Value the discriminator must equal.
    pub when: &'static str,
    /// Outcome if it does.
    pub then: R,
}

/// Returns the outcome of the first rule matching `value`, or `fallback`.
pub fn decide<R: Copy>(rules: &[Rule<R>], value: &str, fallback: R) -> R {
    rules
        .iter()
        .find(|rule| rule.when == value)
        .map_or(fallback, |rule| rule.then)
}

// =============================================================================
// Level 1: message kind
// =============================================================================

/// Outcome of level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRoute {
    TextChat,
    Event,
    DefaultAck,
}

pub const MESSAGE_RULES: &[Rule<MessageRoute>] = &[
    Rule {
        when: MSG_TYPE_TEXT,
        then: MessageRoute::TextChat,
    },
    Rule {
        when: MSG_TYPE_EVENT,
        then: MessageRoute::Event,
    },
];

/// Classifies a `MsgType` value. Unknown kinds are acknowledged.
pub fn message_route(msg_type: &str) -> MessageRoute {
    decide(MESSAGE_RULES, msg_type, MessageRoute::DefaultAck)
}

// =============================================================================
// Level 2: event classification by service
// =============================================================================

/// Outcome of level 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRoute {
    Verification,
    Notify,
    DefaultAck,
}

/// A level 2 row: a service name, optionally paired with a required event type.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRule {
    pub service: &'static str,
    pub event: Option<&'static str>,
    pub then: EventRoute,
}

impl ServiceRule {
    fn matches(&self, service: &str, event_type: &str) -> bool {
        self.service == service && self.event.is_none_or(|event| event == event_type)
    }
}

pub const SERVICE_RULES: &[ServiceRule] = &[
    ServiceRule {
        service: SERVICE_CHECK,
        event: Some(EVENT_VERIFYGW),
        then: EventRoute::Verification,
    },
    ServiceRule {
        service: SERVICE_PUBLIC_MESSAGE_NOTIFY,
        event: None,
        then: EventRoute::Notify,
    },
];

/// Classifies an event by the service it arrived on.
///
/// Unknown services, and the check service with any event other than
/// `verifygw`, are acknowledged.
pub fn event_route(service: &str, event_type: &str) -> EventRoute {
    SERVICE_RULES
        .iter()
        .find(|rule| rule.matches(service, event_type))
        .map_or(EventRoute::DefaultAck, |rule| rule.then)
}

// =============================================================================
// Level 3: notify events
// =============================================================================

/// Outcome of level 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyRoute {
    Follow,
    Unfollow,
    Click,
    Enter,
    DefaultAck,
}

pub const NOTIFY_RULES: &[Rule<NotifyRoute>] = &[
    Rule {
        when: EVENT_FOLLOW,
        then: NotifyRoute::Follow,
    },
    Rule {
        when: EVENT_UNFOLLOW,
        then: NotifyRoute::Unfollow,
    },
    Rule {
        when: EVENT_CLICK,
        then: NotifyRoute::Click,
    },
    Rule {
        when: EVENT_ENTER,
        then: NotifyRoute::Enter,
    },
];

/// Classifies a notify-service `EventType`.
pub fn notify_route(event_type: &str) -> NotifyRoute {
    decide(NOTIFY_RULES, event_type, NotifyRoute::DefaultAck)
}

// =============================================================================
// Level 4a: click actions
// =============================================================================

/// Outcome of level 4a.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRoute {
    /// Platform-reserved action.
    Reserved(ReservedAction),
    /// Integrator menu key; resolved against the menu table.
    Menu,
}

pub const CLICK_RULES: &[Rule<ClickRoute>] = &[
    Rule {
        when: ACTION_AUTHENTICATION,
        then: ClickRoute::Reserved(ReservedAction::Authentication),
    },
    Rule {
        when: ACTION_DELETE,
        then: ClickRoute::Reserved(ReservedAction::Delete),
    },
];

/// Classifies a click `ActionParam`.
pub fn click_route(action: &str) -> ClickRoute {
    decide(CLICK_RULES, action, ClickRoute::Menu)
}

// =============================================================================
// Level 4b: enter scenes
// =============================================================================

/// Outcome of level 4b.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterRoute {
    CustomScene,
    Plain,
}

/// Classifies an enter event by its `ActionParam.scene.sceneId`.
///
/// Any failure to read the scene id selects [`EnterRoute::Plain`].
pub fn enter_route(content: &DecodedContent) -> EnterRoute {
    match scene_id(content) {
        Some(_) => EnterRoute::CustomScene,
        None => EnterRoute::Plain,
    }
}

/// Reads `ActionParam.scene.sceneId`.
///
/// `ActionParam` may be a nested mapping or, as the platform sends it, a JSON
/// object encoded as text.
pub fn scene_id(content: &DecodedContent) -> Option<String> {
    let param = content.get(FIELD_ACTION_PARAM)?;
    let parsed: Value;
    let param = match param {
        Value::String(text) => {
            parsed = serde_json::from_str(text).ok()?;
            &parsed
        }
        other => other,
    };
    let id = param.get(FIELD_SCENE)?.get(FIELD_SCENE_ID)?;
    non_empty_str(id).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(value: Value) -> DecodedContent {
        match value {
            Value::Object(map) => DecodedContent::new(map),
            _ => panic!("test content must be an object"),
        }
    }

    #[test]
    fn test_message_route() {
        assert_eq!(message_route("text"), MessageRoute::TextChat);
        assert_eq!(message_route("event"), MessageRoute::Event);
        assert_eq!(message_route("image"), MessageRoute::DefaultAck);
        assert_eq!(message_route("TEXT"), MessageRoute::DefaultAck);
    }

    #[test]
    fn test_event_route() {
        assert_eq!(
            event_route(SERVICE_CHECK, EVENT_VERIFYGW),
            EventRoute::Verification
        );
        assert_eq!(event_route(SERVICE_CHECK, EVENT_FOLLOW), EventRoute::DefaultAck);
        assert_eq!(
            event_route(SERVICE_PUBLIC_MESSAGE_NOTIFY, EVENT_VERIFYGW),
            EventRoute::Notify
        );
        assert_eq!(
            event_route(SERVICE_PUBLIC_MESSAGE_NOTIFY, "anything"),
            EventRoute::Notify
        );
        assert_eq!(event_route("unknown.service", EVENT_FOLLOW), EventRoute::DefaultAck);
    }

    #[test]
    fn test_notify_route() {
        assert_eq!(notify_route("follow"), NotifyRoute::Follow);
        assert_eq!(notify_route("unfollow"), NotifyRoute::Unfollow);
        assert_eq!(notify_route("click"), NotifyRoute::Click);
        assert_eq!(notify_route("enter"), NotifyRoute::Enter);
        assert_eq!(notify_route("verifygw"), NotifyRoute::DefaultAck);
    }

    #[test]
    fn test_click_route() {
        assert_eq!(
            click_route("authentication"),
            ClickRoute::Reserved(ReservedAction::Authentication)
        );
        assert_eq!(
            click_route("delete"),
            ClickRoute::Reserved(ReservedAction::Delete)
        );
        assert_eq!(click_route("async_image_text"), ClickRoute::Menu);
        assert_eq!(click_route(""), ClickRoute::Menu);
    }

    #[test]
    fn test_scene_id_nested() {
        let c = content(json!({ "ActionParam": { "scene": { "sceneId": "abc" } } }));
        assert_eq!(scene_id(&c).as_deref(), Some("abc"));
        assert_eq!(enter_route(&c), EnterRoute::CustomScene);
    }

    #[test]
    fn test_scene_id_json_text() {
        let c = content(json!({ "ActionParam": r#"{"scene":{"sceneId":"qr-7"}}"# }));
        assert_eq!(scene_id(&c).as_deref(), Some("qr-7"));
    }

    #[test]
    fn test_scene_id_soft_failures() {
        let cases = [
            json!({}),
            json!({ "ActionParam": "" }),
            json!({ "ActionParam": "not json" }),
            json!({ "ActionParam": "[1, 2]" }),
            json!({ "ActionParam": {} }),
            json!({ "ActionParam": { "scene": "flat" } }),
            json!({ "ActionParam": { "scene": {} } }),
            json!({ "ActionParam": { "scene": { "sceneId": "" } } }),
            json!({ "ActionParam": { "scene": { "sceneId": { "deep": "x" } } } }),
        ];
        for case in cases {
            assert_eq!(enter_route(&content(case.clone())), EnterRoute::Plain, "{case}");
        }
    }

    #[test]
    fn test_tables_have_no_duplicate_keys() {
        fn unique<R>(rules: &[Rule<R>]) -> bool {
            let mut keys: Vec<_> = rules.iter().map(|r| r.when).collect();
            keys.sort_unstable();
            keys.windows(2).all(|w| w[0] != w[1])
        }
        assert!(unique(MESSAGE_RULES));
        assert!(unique(NOTIFY_RULES));
        assert!(unique(CLICK_RULES));
    }
}
