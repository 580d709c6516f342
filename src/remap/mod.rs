//! Channel remapping.
//!
//! # Data Flow
//! ```text
//! matched registration + resolved path
//!     → retire placeholder (atomic swap on the registration,
//!       then remove from the channel table)
//!     → RemapStrategy::remap (get-or-create concrete channel,
//!       update registrations, bind the request)
//! ```
//!
//! # Design Decisions
//! - The placeholder leaves the channel table before the strategy runs, so
//!   nothing can subscribe to the stale id afterwards
//! - Retirement happens once per registration; later calls are no-ops
//! - Strategy errors propagate unchanged; no retries here

pub mod strategy;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::inject::{InjectionError, Injector};
use crate::observability::metrics;
use crate::pipeline::InboundRequest;
use crate::registry::{Registration, Registry};

pub use strategy::{ForkStrategy, RebindStrategy};

/// Errors a remap can return to the pipeline.
#[derive(Debug, Error)]
pub enum RemapError {
    /// Injecting a forked handler failed.
    #[error("injection failed: {0}")]
    Injection(#[from] InjectionError),

    /// The strategy could not complete for its own reasons.
    #[error("remapping strategy failed: {0}")]
    Strategy(String),
}

/// Everything a strategy receives for one remap.
pub struct RemapContext<'a> {
    /// True if this call retired the placeholder.
    pub retired: bool,
    pub resolved_path: &'a str,
    pub request: &'a mut dyn InboundRequest,
    pub registration: &'a Arc<Registration>,
    pub registry: &'a Registry,
    /// Present only when forked handlers need injection.
    pub injector: Option<&'a dyn Injector>,
}

/// How a registration is rewritten once its route is resolved.
pub trait RemapStrategy: Send + Sync + fmt::Debug {
    fn remap(&self, ctx: RemapContext<'_>) -> Result<(), RemapError>;
}

/// Retires placeholders and hands off to a [`RemapStrategy`].
#[derive(Clone)]
pub struct ChannelRemapper {
    registry: Arc<Registry>,
    strategy: Arc<dyn RemapStrategy>,
    injector: Option<Arc<dyn Injector>>,
}

impl fmt::Debug for ChannelRemapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRemapper")
            .field("strategy", &self.strategy)
            .field("injection", &self.injector.is_some())
            .finish()
    }
}

impl ChannelRemapper {
    pub fn new(
        registry: Arc<Registry>,
        strategy: Arc<dyn RemapStrategy>,
        injector: Option<Arc<dyn Injector>>,
    ) -> Self {
        Self {
            registry,
            strategy,
            injector,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Remap `registration` for a request that resolved to `resolved_path`.
    pub fn remap(
        &self,
        registration: &Arc<Registration>,
        resolved_path: &str,
        request: &mut dyn InboundRequest,
    ) -> Result<(), RemapError> {
        let retired = match registration.retire_placeholder() {
            Some(placeholder) => {
                self.registry.remove_channel(placeholder.id());
                tracing::debug!(
                    key = %registration.key(),
                    placeholder = %placeholder.id(),
                    resolved_path = %resolved_path,
                    "Placeholder channel retired"
                );
                metrics::record_placeholder_retired();
                true
            }
            None => false,
        };

        self.strategy.remap(RemapContext {
            retired,
            resolved_path,
            request,
            registration,
            registry: &self.registry,
            injector: self.injector.as_deref(),
        })
    }
}
