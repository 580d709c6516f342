//! Built-in remapping strategies.
//!
//! # Strategies
//! - `fork`: persist a concrete registration per resolved path, with a
//!   forked (and optionally injected) handler. Later requests for the same
//!   path are served by that registration directly.
//! - `rebind`: bind the request to the concrete channel only. The registry
//!   keeps no per-path registration, so every request resolves again.

use std::sync::Arc;

use crate::config::StrategyKind;
use crate::inject::InjectionTarget;
use crate::pipeline::Binding;
use crate::registry::Registration;
use crate::remap::{RemapContext, RemapError, RemapStrategy};
use crate::routing::is_templated;

/// Strategy for a configured kind.
pub fn for_kind(kind: StrategyKind) -> Arc<dyn RemapStrategy> {
    match kind {
        StrategyKind::Fork => Arc::new(ForkStrategy),
        StrategyKind::Rebind => Arc::new(RebindStrategy),
    }
}

fn ensure_concrete(resolved_path: &str) -> Result<(), RemapError> {
    if is_templated(resolved_path) {
        return Err(RemapError::Strategy(format!(
            "resolved path `{resolved_path}` still carries template syntax"
        )));
    }
    Ok(())
}

/// Bind to the registration's own channel when it is already concrete.
fn bind_existing(ctx: &mut RemapContext<'_>, registration: Arc<Registration>) -> bool {
    match registration.channel() {
        Some(channel) if !channel.is_placeholder() => {
            ctx.request.bind(Binding {
                registration,
                channel,
                new_mapping: false,
            });
            true
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ForkStrategy;

impl RemapStrategy for ForkStrategy {
    fn remap(&self, mut ctx: RemapContext<'_>) -> Result<(), RemapError> {
        if let Some(existing) = ctx.registry.registration(ctx.resolved_path) {
            if bind_existing(&mut ctx, existing) {
                return Ok(());
            }
        }
        ensure_concrete(ctx.resolved_path)?;

        let handler = ctx.registration.handler().fork();
        if let Some(injector) = ctx.injector {
            injector.inject(
                handler.as_ref(),
                InjectionTarget {
                    template: ctx.registration.key(),
                    resolved_path: ctx.resolved_path,
                    base_path: ctx.request.base_path(),
                    registry: ctx.registry,
                },
            )?;
        }
        // failed injections leave no concrete channel
        let (channel, _) = ctx.registry.get_or_create(ctx.resolved_path);

        let concrete = Arc::new(Registration::new(ctx.resolved_path, handler, Some(channel.clone())));
        let (concrete, inserted) = ctx.registry.insert_registration_if_absent(concrete);
        let channel = concrete.channel().unwrap_or(channel);

        if inserted {
            tracing::info!(
                template = %ctx.registration.key(),
                path = %ctx.resolved_path,
                retired = ctx.retired,
                "New concrete mapping"
            );
        }

        ctx.request.bind(Binding {
            registration: concrete,
            channel,
            new_mapping: inserted,
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RebindStrategy;

impl RemapStrategy for RebindStrategy {
    fn remap(&self, mut ctx: RemapContext<'_>) -> Result<(), RemapError> {
        let registration = ctx.registration;
        if !registration.is_templated() && bind_existing(&mut ctx, registration.clone()) {
            return Ok(());
        }
        ensure_concrete(ctx.resolved_path)?;

        let (channel, created) = ctx.registry.get_or_create(ctx.resolved_path);
        tracing::debug!(
            template = %ctx.registration.key(),
            path = %ctx.resolved_path,
            created,
            "Request bound to concrete channel"
        );
        ctx.request.bind(Binding {
            registration: ctx.registration.clone(),
            channel,
            new_mapping: created,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::BroadcastHandler;
    use crate::inject::{ChannelInjector, InjectionError};
    use crate::pipeline::PathRequest;
    use crate::registry::Registry;
    use crate::remap::ChannelRemapper;

    fn setup(named: Vec<String>) -> (Arc<Registry>, Arc<Registration>) {
        let registry = Arc::new(Registry::new());
        let reg = registry.register("/room/{id}", Arc::new(BroadcastHandler::new(named)));
        (registry, reg)
    }

    #[test]
    fn test_fork_end_to_end() {
        let (registry, reg) = setup(vec![]);
        let remapper = ChannelRemapper::new(registry.clone(), Arc::new(ForkStrategy), None);

        let mut req = PathRequest::new("/room/42");
        remapper.remap(&reg, "/room/42", &mut req).unwrap();

        assert!(registry.channel("/room/{id}").is_none());
        let concrete = registry.channel("/room/42").unwrap();
        let binding = req.binding().unwrap();
        assert!(binding.new_mapping);
        assert!(Arc::ptr_eq(&binding.channel, &concrete));
        assert_eq!(binding.registration.key(), "/room/42");
        assert!(Arc::ptr_eq(&registry.registration("/room/42").unwrap(), &binding.registration));
    }

    #[test]
    fn test_fork_is_idempotent_on_concrete_registration() {
        let (registry, reg) = setup(vec![]);
        let remapper = ChannelRemapper::new(registry.clone(), Arc::new(ForkStrategy), None);
        remapper.remap(&reg, "/room/42", &mut PathRequest::new("/room/42")).unwrap();

        let concrete = registry.registration("/room/42").unwrap();
        let channels_before = registry.channel_count();

        let mut again = PathRequest::new("/room/42");
        remapper.remap(&concrete, "/room/42", &mut again).unwrap();

        assert_eq!(registry.channel_count(), channels_before);
        let binding = again.binding().unwrap();
        assert!(!binding.new_mapping);
        assert!(Arc::ptr_eq(&binding.registration, &concrete));
    }

    #[test]
    fn test_fork_injects_forked_handler() {
        let (registry, reg) = setup(vec!["/mirror/{id}".into()]);
        let remapper = ChannelRemapper::new(
            registry.clone(),
            Arc::new(ForkStrategy),
            Some(Arc::new(ChannelInjector)),
        );

        let mut req = PathRequest::new("/room/7");
        remapper.remap(&reg, "/room/7", &mut req).unwrap();

        let mirror = registry.channel("/mirror/7").unwrap();
        let mut sub = mirror.subscribe();
        let binding = req.binding().unwrap();
        binding
            .registration
            .handler()
            .on_message(&binding.channel, "hello".into());
        assert_eq!(sub.receiver.try_recv().unwrap(), "hello");
    }

    #[test]
    fn test_fork_injection_failure_is_returned() {
        let (registry, reg) = setup(vec!["/user/{user}".into()]);
        let remapper = ChannelRemapper::new(
            registry.clone(),
            Arc::new(ForkStrategy),
            Some(Arc::new(ChannelInjector)),
        );

        let err = remapper
            .remap(&reg, "/room/7", &mut PathRequest::new("/room/7"))
            .unwrap_err();
        assert!(matches!(err, RemapError::Injection(InjectionError::Unbound { .. })));
        assert!(registry.registration("/room/7").is_none());
        assert!(registry.channel("/room/7").is_none());
    }

    #[test]
    fn test_rebind_does_not_persist() {
        let (registry, reg) = setup(vec![]);
        let remapper = ChannelRemapper::new(registry.clone(), Arc::new(RebindStrategy), None);

        let mut first = PathRequest::new("/room/42");
        remapper.remap(&reg, "/room/42", &mut first).unwrap();
        let mut second = PathRequest::new("/room/42");
        remapper.remap(&reg, "/room/42", &mut second).unwrap();

        assert!(registry.registration("/room/42").is_none());
        let (a, b) = (first.binding().unwrap(), second.binding().unwrap());
        assert!(a.new_mapping);
        assert!(!b.new_mapping);
        assert!(Arc::ptr_eq(&a.channel, &b.channel));
        assert_eq!(a.registration.key(), "/room/{id}");
    }

    #[test]
    fn test_templated_resolved_path_is_rejected() {
        let (registry, reg) = setup(vec![]);
        let remapper = ChannelRemapper::new(registry.clone(), Arc::new(ForkStrategy), None);

        let err = remapper
            .remap(&reg, "/room/{id}", &mut PathRequest::new("/room/{id}"))
            .unwrap_err();
        assert!(matches!(err, RemapError::Strategy(_)));
        assert!(registry.channel("/room/{id}").is_none());
    }

    #[test]
    fn test_for_kind() {
        assert_eq!(format!("{:?}", for_kind(StrategyKind::Fork)), "ForkStrategy");
        assert_eq!(format!("{:?}", for_kind(StrategyKind::Rebind)), "RebindStrategy");
    }
}
