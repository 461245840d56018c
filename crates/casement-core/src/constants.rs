//! Platform constants.
//!
//! All comparisons against these values are exact and case-sensitive.

/// Form parameter carrying the service name.
pub const PARAM_SERVICE: &str = "service";
/// Form parameter carrying the business content.
pub const PARAM_BIZ_CONTENT: &str = "biz_content";

// Discriminator fields of the decoded content.
pub const FIELD_MSG_TYPE: &str = "MsgType";
pub const FIELD_EVENT_TYPE: &str = "EventType";
pub const FIELD_ACTION_PARAM: &str = "ActionParam";
pub const FIELD_SCENE: &str = "scene";
pub const FIELD_SCENE_ID: &str = "sceneId";

/// Developer gateway verification service.
pub const SERVICE_CHECK: &str = "alipay.service.check";
/// Public account message notification service.
pub const SERVICE_PUBLIC_MESSAGE_NOTIFY: &str = "alipay.mobile.public.message.notify";

pub const MSG_TYPE_TEXT: &str = "text";
pub const MSG_TYPE_EVENT: &str = "event";

pub const EVENT_VERIFYGW: &str = "verifygw";
pub const EVENT_FOLLOW: &str = "follow";
pub const EVENT_UNFOLLOW: &str = "unfollow";
pub const EVENT_CLICK: &str = "click";
pub const EVENT_ENTER: &str = "enter";

/// Reserved click action: request to bind a developer account.
pub const ACTION_AUTHENTICATION: &str = "authentication";
/// Reserved click action: request to remove a developer account binding.
pub const ACTION_DELETE: &str = "delete";

/// Every click action the platform reserves. Integrators cannot register these.
pub const RESERVED_ACTIONS: &[&str] = &[ACTION_AUTHENTICATION, ACTION_DELETE];

/// Sample menu key shipped in the default configuration.
pub const MENU_ASYNC_IMAGE_TEXT: &str = "async_image_text";
/// Handler bound to [`MENU_ASYNC_IMAGE_TEXT`] by default.
pub const HANDLER_ASYNC_MSG_SEND: &str = "async_msg_send";
