//! Gateway: a configured router plus the handlers it dispatches to.
//!
//! The [`Gateway`] is what an HTTP endpoint receiving platform notifications
//! holds on to. It owns:
//!
//! - a [`Router`] built from [`GatewayConfig`] (content format and menu keys)
//! - the shared [`MenuRegistry`], open for run-time registration
//! - a [`HandlerRegistry`] preloaded with an acknowledging default handler
//!
//! ```rust,ignore
//! use casement_runtime::{Gateway, config::load_config};
//!
//! let config = load_config()?;
//! let mut gateway = Gateway::bootstrap(&config)?;
//! gateway.handlers_mut().register(HandlerKind::Follow, FollowHandler::new());
//!
//! // In the request handler:
//! let response = gateway.process(&form_params).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use casement_core::{
    AckHandler, HandlerKind, HandlerRegistry, HandlerResponse, HandlerVariant, InboundEnvelope,
    MenuRegistry, Router, decoder_for,
};
use tracing::{info, warn};

use crate::config::{CasementConfig, GatewayConfig, validate_config, validate_gateway_config};
use crate::error::GatewayResult;
use crate::logging;

/// A configured notification gateway.
#[derive(Clone, Debug)]
pub struct Gateway {
    router: Router,
    menus: MenuRegistry,
    handlers: HandlerRegistry,
}

impl Gateway {
    /// Validates `config`, initializes logging and builds a gateway.
    pub fn bootstrap(config: &CasementConfig) -> GatewayResult<Self> {
        validate_config(config)?;
        logging::init_from_config(&config.logging)?;
        Self::from_config(&config.gateway)
    }

    /// Builds a gateway from routing settings.
    ///
    /// Registers every configured menu key and an [`AckHandler`] for
    /// [`HandlerKind::DefaultAck`].
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        validate_gateway_config(config)?;

        let menus = MenuRegistry::new();
        for (key, handler) in &config.menus {
            menus.register(key.as_str(), handler.as_str())?;
        }

        let router = Router::from_parts(
            Arc::from(decoder_for(config.content_format)),
            Arc::new(menus.clone()),
        );

        let mut handlers = HandlerRegistry::new();
        handlers.register(HandlerKind::DefaultAck, AckHandler);

        info!(
            content_format = %config.content_format,
            menus = menus.len(),
            "Gateway ready"
        );

        Ok(Self {
            router,
            menus,
            handlers,
        })
    }

    /// Replaces the handler registry.
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Returns the router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the menu registry shared with the router.
    ///
    /// Keys registered here take effect for the next routed notification.
    pub fn menus(&self) -> &MenuRegistry {
        &self.menus
    }

    /// Returns the handler registry.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Returns the handler registry for registration.
    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }

    /// Routes a notification without executing its handler.
    pub fn route(&self, service_name: &str, raw_content: &str) -> GatewayResult<HandlerVariant> {
        Ok(self.router.route(service_name, raw_content)?)
    }

    /// Routes a notification given as the platform's form parameters.
    pub fn route_params(&self, params: &HashMap<String, String>) -> GatewayResult<HandlerVariant> {
        let envelope = InboundEnvelope::from_params(params);
        Ok(self.router.route_envelope(&envelope)?)
    }

    /// Routes a notification and executes the selected handler.
    pub async fn process(&self, params: &HashMap<String, String>) -> GatewayResult<HandlerResponse> {
        let variant = self.route_params(params).inspect_err(|e| {
            warn!(error = %e, "Failed to route notification");
        })?;

        let response = self.handlers.dispatch(&variant).await.inspect_err(|e| {
            warn!(kind = %variant.kind(), error = %e, "Failed to handle notification");
        })?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use async_trait::async_trait;
    use casement_core::{
        ActionHandler, ContentFormat, DispatchError, HandlerError, ReservedAction, RoutingError,
    };

    const NOTIFY: &str = "alipay.mobile.public.message.notify";

    struct Echo(&'static str);

    #[async_trait]
    impl ActionHandler for Echo {
        fn name(&self) -> &str {
            self.0
        }

        async fn execute(&self, variant: &HandlerVariant) -> Result<HandlerResponse, HandlerError> {
            let from = variant
                .content()
                .and_then(|c| c.get_str("FromUserId"))
                .unwrap_or("-");
            Ok(HandlerResponse::Body(format!("{}:{from}", self.0)))
        }
    }

    fn json_gateway() -> Gateway {
        let config = GatewayConfig {
            content_format: ContentFormat::Json,
            ..GatewayConfig::default()
        };
        Gateway::from_config(&config).unwrap()
    }

    fn params(service: &str, content: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("service".to_string(), service.to_string());
        params.insert("biz_content".to_string(), content.to_string());
        params.insert("sign".to_string(), "ignored".to_string());
        params
    }

    #[tokio::test]
    async fn test_process_follow() {
        let mut gateway = json_gateway();
        gateway.handlers_mut().register(HandlerKind::Follow, Echo("follow"));

        let response = gateway
            .process(&params(
                NOTIFY,
                r#"{"MsgType":"event","EventType":"follow","FromUserId":"2088"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response, HandlerResponse::Body("follow:2088".into()));
    }

    #[tokio::test]
    async fn test_process_unregistered_kind_acknowledged() {
        let gateway = json_gateway();
        let response = gateway
            .process(&params(NOTIFY, r#"{"MsgType":"text","Text":"hi"}"#))
            .await
            .unwrap();
        assert_eq!(response, HandlerResponse::Ack);
    }

    #[tokio::test]
    async fn test_process_reserved_action() {
        let gateway = json_gateway();
        let result = gateway
            .process(&params(
                NOTIFY,
                r#"{"MsgType":"event","EventType":"click","ActionParam":"delete"}"#,
            ))
            .await;
        assert!(matches!(
            result,
            Err(GatewayError::Dispatch(DispatchError::NotImplemented(
                ReservedAction::Delete
            )))
        ));
    }

    #[tokio::test]
    async fn test_process_missing_params() {
        let gateway = json_gateway();
        let result = gateway.process(&HashMap::new()).await;
        assert!(matches!(
            result,
            Err(GatewayError::Routing(RoutingError::MissingServiceName))
        ));
    }

    #[test]
    fn test_configured_menus_route() {
        let mut config = GatewayConfig {
            content_format: ContentFormat::Json,
            ..GatewayConfig::default()
        };
        config.menus.insert("news".into(), "news_handler".into());
        let gateway = Gateway::from_config(&config).unwrap();

        let variant = gateway
            .route(NOTIFY, r#"{"MsgType":"event","EventType":"click","ActionParam":"news"}"#)
            .unwrap();
        assert_eq!(
            variant,
            HandlerVariant::CustomMenuAction {
                key: "news".into(),
                handler: "news_handler".into(),
                content: variant.content().cloned().unwrap(),
            }
        );
    }

    #[test]
    fn test_runtime_menu_registration() {
        let gateway = json_gateway();
        let raw = r#"{"MsgType":"event","EventType":"click","ActionParam":"late_key"}"#;

        assert_eq!(gateway.route(NOTIFY, raw).unwrap().kind(), HandlerKind::Unmapped);
        gateway.menus().register("late_key", "late_handler").unwrap();
        assert_eq!(
            gateway.route(NOTIFY, raw).unwrap().kind(),
            HandlerKind::CustomMenuAction
        );
    }

    #[test]
    fn test_bootstrap_unwritable_log_file() {
        use crate::config::LogOutput;

        figment::Jail::expect_with(|jail| {
            jail.create_file("logs", "a file, not a directory")?;

            let mut config = CasementConfig::default();
            config.logging.output = LogOutput::File;
            config.logging.file_path = Some(jail.directory().join("logs").join("casement.log"));

            assert!(matches!(
                Gateway::bootstrap(&config),
                Err(GatewayError::Config(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GatewayConfig::default();
        config.menus.insert("authentication".into(), "bind".into());
        assert!(matches!(
            Gateway::from_config(&config),
            Err(GatewayError::Config(_))
        ));
    }

    #[cfg(feature = "xml")]
    #[test]
    fn test_default_config_routes_xml() {
        let gateway = Gateway::from_config(&GatewayConfig::default()).unwrap();
        let variant = gateway
            .route(
                "alipay.service.check",
                "<XML><MsgType>event</MsgType><EventType>verifygw</EventType></XML>",
            )
            .unwrap();
        assert_eq!(variant, HandlerVariant::Verification);
    }
}
