//! Interceptor contract and ordered chain.

use std::sync::Arc;

use crate::pipeline::InboundRequest;
use crate::remap::RemapError;

/// What the pipeline does after an interceptor ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep processing.
    Continue,
    /// Stop; the interceptor has dealt with the request.
    Abort,
}

/// Position of an interceptor relative to the default matching step.
///
/// Variants are declared in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    FirstBeforeDefault,
    BeforeDefault,
    /// The default request-to-route matching step.
    Default,
    AfterDefault,
}

/// A step of the request pipeline.
pub trait Interceptor: Send + Sync {
    fn priority(&self) -> Priority {
        Priority::AfterDefault
    }

    fn inspect(&self, request: &mut dyn InboundRequest) -> Result<Action, RemapError>;
}

/// Interceptors ordered by priority; equal priorities keep insertion order.
#[derive(Default, Clone)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.push(interceptor);
        self
    }

    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
        // stable sort
        self.interceptors.sort_by_key(|i| i.priority());
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run every interceptor until one does not continue.
    pub fn run(&self, request: &mut dyn InboundRequest) -> Result<Action, RemapError> {
        for interceptor in &self.interceptors {
            if interceptor.inspect(request)? != Action::Continue {
                return Ok(Action::Abort);
            }
        }
        Ok(Action::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PathRequest;
    use std::sync::Mutex;

    struct Step {
        name: &'static str,
        priority: Priority,
        action: Action,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Interceptor for Step {
        fn priority(&self) -> Priority {
            self.priority
        }

        fn inspect(&self, _request: &mut dyn InboundRequest) -> Result<Action, RemapError> {
            self.log.lock().unwrap().push(self.name);
            Ok(self.action)
        }
    }

    fn step(
        name: &'static str,
        priority: Priority,
        action: Action,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn Interceptor> {
        Arc::new(Step {
            name,
            priority,
            action,
            log: log.clone(),
        })
    }

    #[test]
    fn test_runs_in_priority_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new()
            .with(step("after", Priority::AfterDefault, Action::Continue, &log))
            .with(step("default", Priority::Default, Action::Continue, &log))
            .with(step("first", Priority::FirstBeforeDefault, Action::Continue, &log))
            .with(step("after-2", Priority::AfterDefault, Action::Continue, &log));

        let result = chain.run(&mut PathRequest::new("/")).unwrap();
        assert_eq!(result, Action::Continue);
        assert_eq!(*log.lock().unwrap(), vec!["first", "default", "after", "after-2"]);
    }

    #[test]
    fn test_stops_on_abort() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new()
            .with(step("stop", Priority::BeforeDefault, Action::Abort, &log))
            .with(step("never", Priority::AfterDefault, Action::Continue, &log));

        assert_eq!(chain.run(&mut PathRequest::new("/")).unwrap(), Action::Abort);
        assert_eq!(*log.lock().unwrap(), vec!["stop"]);
        assert_eq!(chain.len(), 2);
    }
}
