//! Concurrent remapping against a shared registry.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};

use template_channels::pipeline::{Environment, InboundRequest, Interceptor, PathRequest, TemplateInterceptor};
use template_channels::registry::Channel;
use template_channels::remap::{ForkStrategy, RebindStrategy, RemapStrategy};

mod common;
use common::registry_with;

const THREADS: usize = 32;

/// Run one request per path concurrently, returning the bound channels.
fn race(strategy: Arc<dyn RemapStrategy>, paths: &[String]) -> (Arc<TemplateInterceptor>, Vec<Arc<Channel>>) {
    let registry = registry_with(&["/room/{id}"]);
    let template = registry.registration("/room/{id}").unwrap();
    let hook = Arc::new(TemplateInterceptor::configure(registry, strategy, Environment::default()));
    let barrier = Barrier::new(paths.len());

    let channels: Vec<Arc<Channel>> = std::thread::scope(|s| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| {
                let (hook, template, barrier) = (&hook, &template, &barrier);
                s.spawn(move || {
                    let mut req = PathRequest::new(path.clone());
                    req.set_matched(template.clone());
                    barrier.wait();
                    hook.inspect(&mut req).unwrap();
                    req.binding().unwrap().channel.clone()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    (hook, channels)
}

#[test]
fn test_same_path_creates_one_channel() {
    let strategies: [Arc<dyn RemapStrategy>; 2] = [Arc::new(ForkStrategy), Arc::new(RebindStrategy)];
    for strategy in strategies {
        let paths = vec!["/room/42".to_string(); THREADS];
        let (hook, channels) = race(strategy, &paths);

        let registry = hook.registry();
        assert!(registry.channel("/room/{id}").is_none());
        assert_eq!(registry.channel_count(), 1);

        let concrete = registry.channel("/room/42").unwrap();
        assert!(channels.iter().all(|c| Arc::ptr_eq(c, &concrete)));
    }
}

#[test]
fn test_distinct_paths_get_distinct_channels() {
    let paths: Vec<String> = (0..THREADS).map(|i| format!("/room/{}", i % 4)).collect();
    let (hook, channels) = race(Arc::new(ForkStrategy), &paths);

    let ids: HashSet<&str> = channels.iter().map(|c| c.id()).collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(hook.registry().channel_count(), 4);
    // template plus one concrete registration per room
    assert_eq!(hook.registry().keys().len(), 5);

    for channel in &channels {
        let registered = hook.registry().channel(channel.id()).unwrap();
        assert!(Arc::ptr_eq(channel, &registered));
    }
}
