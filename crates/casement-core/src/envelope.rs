//! Inbound notification envelope.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{PARAM_BIZ_CONTENT, PARAM_SERVICE};
use crate::error::{RoutingError, RoutingResult};

/// A raw inbound notification: the service it was sent to plus its opaque
/// content blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEnvelope {
    /// Service-window channel the notification arrived on.
    pub service_name: String,
    /// Undecoded business content.
    pub raw_content: String,
}

impl InboundEnvelope {
    /// Creates an envelope without validating it.
    pub fn new(service_name: impl Into<String>, raw_content: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            raw_content: raw_content.into(),
        }
    }

    /// Builds an envelope from the platform's form parameters.
    ///
    /// Reads `service` and `biz_content`; other parameters (`sign`,
    /// `sign_type`, `charset`, ...) are left to the caller. Missing
    /// parameters become empty strings and fail [`validate`](Self::validate).
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| params.get(key).cloned().unwrap_or_default();
        Self {
            service_name: get(PARAM_SERVICE),
            raw_content: get(PARAM_BIZ_CONTENT),
        }
    }

    /// Checks that both fields are non-empty.
    pub fn validate(&self) -> RoutingResult<()> {
        validate_parts(&self.service_name, &self.raw_content)
    }
}

/// Validation gate run before any decoding.
pub(crate) fn validate_parts(service_name: &str, raw_content: &str) -> RoutingResult<()> {
    if service_name.is_empty() {
        return Err(RoutingError::MissingServiceName);
    }
    if raw_content.is_empty() {
        return Err(RoutingError::MissingContent);
    }
    Ok(())
}
