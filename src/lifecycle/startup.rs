//! Startup wiring.
//!
//! Builds the registry and the template interceptor from a validated
//! configuration.

use std::sync::Arc;

use crate::config::{validate_config, ConfigError, ServiceConfig};
use crate::handler;
use crate::inject::{ChannelInjector, NamedMarkerProbe};
use crate::pipeline::{Environment, TemplateInterceptor};
use crate::registry::Registry;
use crate::remap::strategy;

/// Register every configured route and configure the interceptor.
pub fn build_interceptor(config: &ServiceConfig) -> Result<TemplateInterceptor, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let registry = Arc::new(Registry::new());
    for route in &config.routes {
        // validated above, unknown kinds cannot reach here
        if let Some(handler) = handler::from_config(route) {
            registry.register(&route.path, handler);
        }
    }

    let env = if config.injection.enabled {
        Environment {
            injector: Some(Arc::new(ChannelInjector)),
            probe: Some(Arc::new(NamedMarkerProbe)),
        }
    } else {
        Environment::default()
    };

    Ok(TemplateInterceptor::configure(
        registry,
        strategy::for_kind(config.remap.strategy),
        env,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, RouteConfig};
    use crate::pipeline::HookMode;

    #[test]
    fn test_build_from_config() {
        let config = parse_config(
            r#"
            [[routes]]
            path = "/room/{id}"
            named = ["/mirror/{id}"]

            [[routes]]
            path = "/chat"
            "#,
        )
        .unwrap();

        let hook = build_interceptor(&config).unwrap();
        assert_eq!(hook.mode(), HookMode::Active { injection: true });
        assert!(hook.registry().channel("/room/{id}").unwrap().is_placeholder());
        assert!(hook.registry().registration("/chat").is_some());
    }

    #[test]
    fn test_injection_disabled() {
        let mut config = ServiceConfig::default();
        config.injection.enabled = false;
        config.routes.push(RouteConfig {
            path: "/room/{id}".into(),
            handler: "broadcast".into(),
            named: vec!["/audit".into()],
        });

        let hook = build_interceptor(&config).unwrap();
        assert_eq!(hook.mode(), HookMode::Active { injection: false });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ServiceConfig::default();
        config.routes.push(RouteConfig {
            path: "/x".into(),
            handler: "teapot".into(),
            named: vec![],
        });
        assert!(matches!(build_interceptor(&config), Err(ConfigError::Validation(_))));
    }
}
