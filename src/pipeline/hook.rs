//! Template remapping interceptor.
//!
//! # States
//! - Inert: no templated key at configuration time; every request continues
//!   immediately
//! - Active: templated keys exist; every matched request is resolved and
//!   remapped, then continues
//!
//! # State Transitions
//! ```text
//! configure(): Inert → Active if any key is templated
//! (never reverses for the lifetime of the configuration)
//! ```
//!
//! # Design Decisions
//! - Runs after the default matching step; it needs the matched registration
//! - Never aborts the pipeline by itself; only strategy errors stop a request

use std::fmt;
use std::sync::Arc;

use crate::inject::{requires_injection, CapabilityProbe, Injector};
use crate::observability::metrics;
use crate::pipeline::{Action, InboundRequest, Interceptor, Priority};
use crate::registry::Registry;
use crate::remap::{ChannelRemapper, RemapError, RemapStrategy};
use crate::routing::{has_templates, resolve_path};

/// Optional facilities supplied by the host environment.
#[derive(Clone, Default)]
pub struct Environment {
    /// Object-injection facility, if the host has one.
    pub injector: Option<Arc<dyn Injector>>,
    /// Capability-marker lookup, if available.
    pub probe: Option<Arc<dyn CapabilityProbe>>,
}

/// Configuration-time state of the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookMode {
    Inert,
    Active {
        /// Forked handlers receive named-dependency injection.
        injection: bool,
    },
}

/// Resolves templated registrations into concrete channels per request.
pub struct TemplateInterceptor {
    mode: HookMode,
    remapper: ChannelRemapper,
}

impl fmt::Debug for TemplateInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateInterceptor")
            .field("mode", &self.mode)
            .field("remapper", &self.remapper)
            .finish()
    }
}

impl TemplateInterceptor {
    /// Inspect the registration set once and fix the hook's mode.
    pub fn configure(registry: Arc<Registry>, strategy: Arc<dyn RemapStrategy>, env: Environment) -> Self {
        let keys = registry.keys();
        let templated = has_templates(keys.iter().map(String::as_str));

        let injection = templated
            && match (&env.injector, &env.probe) {
                (Some(_), Some(probe)) => requires_injection(&registry.registrations(), probe.as_ref()),
                _ => false,
            };

        let mode = if templated {
            HookMode::Active { injection }
        } else {
            HookMode::Inert
        };
        let injector = if injection { env.injector } else { None };

        tracing::info!(
            registrations = keys.len(),
            mode = ?mode,
            strategy = ?strategy,
            "Template interceptor configured"
        );

        Self {
            mode,
            remapper: ChannelRemapper::new(registry, strategy, injector),
        }
    }

    pub fn mode(&self) -> HookMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, HookMode::Active { .. })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.remapper.registry()
    }
}

impl Interceptor for TemplateInterceptor {
    fn priority(&self) -> Priority {
        Priority::AfterDefault
    }

    fn inspect(&self, request: &mut dyn InboundRequest) -> Result<Action, RemapError> {
        if !self.is_active() {
            return Ok(Action::Continue);
        }
        let Some(registration) = request.matched() else {
            return Ok(Action::Continue);
        };

        let path = resolve_path(request);
        match self.remapper.remap(&registration, &path, request) {
            Ok(()) => metrics::record_remap("ok"),
            Err(e) => {
                tracing::warn!(key = %registration.key(), path = %path, error = %e, "Remap failed");
                metrics::record_remap("error");
                return Err(e);
            }
        }
        Ok(Action::Continue)
    }
}
