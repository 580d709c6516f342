//! Object injection for forked handlers.

use crate::handler::Handler;
use crate::inject::InjectionError;
use crate::registry::Registry;
use crate::routing::{bind_variables, expand, is_templated, TemplateVars};

/// Where an injection happens: the template that matched, the path it
/// resolved to, and the registry to draw channels from.
#[derive(Debug, Clone, Copy)]
pub struct InjectionTarget<'a> {
    pub template: &'a str,
    pub resolved_path: &'a str,
    /// Prefix the transport mounted the template under, if any.
    pub base_path: Option<&'a str>,
    pub registry: &'a Registry,
}

impl InjectionTarget<'_> {
    /// Variables of the template, bound against the resolved path.
    ///
    /// A template registered below a mount prefix does not carry the
    /// prefix, so the path without the base path is tried next.
    pub fn variables(&self) -> Option<TemplateVars> {
        bind_variables(self.template, self.resolved_path).or_else(|| {
            let base = self.base_path.filter(|b| !b.is_empty())?;
            let rest = match self.resolved_path.strip_prefix(base)? {
                "" => "/",
                rest if rest.starts_with('/') => rest,
                _ => return None,
            };
            bind_variables(self.template, rest)
        })
    }
}

/// Supplies a handler with its named dependencies.
pub trait Injector: Send + Sync {
    fn inject(&self, handler: &dyn Handler, target: InjectionTarget<'_>) -> Result<(), InjectionError>;
}

/// Resolves every named dependency to a channel in the registry.
///
/// Templated names are expanded with the variables bound from the
/// resolved path, so `/mirror/{id}` under `/room/{id}` at `/room/42`
/// yields channel `/mirror/42`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelInjector;

impl Injector for ChannelInjector {
    fn inject(&self, handler: &dyn Handler, target: InjectionTarget<'_>) -> Result<(), InjectionError> {
        let unbound = |name: &str| InjectionError::Unbound {
            name: name.to_string(),
            path: target.resolved_path.to_string(),
        };

        for name in handler.named_dependencies() {
            let channel_id = if is_templated(name) {
                let vars = target.variables().ok_or_else(|| unbound(name))?;
                expand(name, &vars).map_err(|_| unbound(name))?
            } else {
                name.clone()
            };

            let (channel, _) = target.registry.get_or_create(&channel_id);
            handler.inject(name, channel)?;
            tracing::debug!(kind = %handler.kind(), name = %name, channel = %channel_id, "Injected named dependency");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::BroadcastHandler;

    fn target<'a>(registry: &'a Registry, resolved_path: &'a str) -> InjectionTarget<'a> {
        InjectionTarget {
            template: "/room/{id}",
            resolved_path,
            base_path: None,
            registry,
        }
    }

    #[test]
    fn test_injects_templated_and_plain_names() {
        let registry = Registry::new();
        let handler = BroadcastHandler::new(vec!["/mirror/{id}".into(), "/audit".into()]);

        ChannelInjector
            .inject(&handler, target(&registry, "/room/42"))
            .unwrap();

        assert_eq!(handler.injected("/mirror/{id}").unwrap().id(), "/mirror/42");
        assert_eq!(handler.injected("/audit").unwrap().id(), "/audit");
        assert!(registry.channel("/mirror/42").is_some());
    }

    #[test]
    fn test_unbound_variable_is_typed_error() {
        let registry = Registry::new();
        let handler = BroadcastHandler::new(vec!["/user/{user}".into()]);

        let err = ChannelInjector
            .inject(&handler, target(&registry, "/room/42"))
            .unwrap_err();
        assert_eq!(
            err,
            InjectionError::Unbound {
                name: "/user/{user}".into(),
                path: "/room/42".into(),
            }
        );
    }

    #[test]
    fn test_path_not_matching_template() {
        let registry = Registry::new();
        let handler = BroadcastHandler::new(vec!["/mirror/{id}".into()]);

        let err = ChannelInjector
            .inject(&handler, target(&registry, "/elsewhere"))
            .unwrap_err();
        assert!(matches!(err, InjectionError::Unbound { .. }));
    }

    #[test]
    fn test_binds_below_mount_prefix() {
        let registry = Registry::new();
        let handler = BroadcastHandler::new(vec!["/mirror/{id}".into()]);
        let target = InjectionTarget {
            base_path: Some("/api"),
            ..target(&registry, "/api/room/9")
        };

        ChannelInjector.inject(&handler, target).unwrap();
        assert_eq!(handler.injected("/mirror/{id}").unwrap().id(), "/mirror/9");
    }

    #[test]
    fn test_base_path_must_end_on_segment_boundary() {
        let registry = Registry::new();
        let partial = InjectionTarget {
            base_path: Some("/ap"),
            ..target(&registry, "/api/room/9")
        };
        assert!(partial.variables().is_none());

        let whole = InjectionTarget {
            base_path: Some("/room"),
            ..target(&registry, "/room/9")
        };
        // the full path binds first
        assert_eq!(whole.variables().unwrap()["id"], "9");
    }
}
