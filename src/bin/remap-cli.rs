use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use template_channels::config::load_config;
use template_channels::pipeline::{InboundRequest, InterceptorChain, PathRequest, RouteMatcher};
use template_channels::registry::RegistrySnapshot;
use template_channels::build_interceptor;

#[derive(Parser)]
#[command(name = "remap-cli")]
#[command(about = "Resolve request paths against a route configuration", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Request paths to resolve, in order.
    paths: Vec<String>,
}

#[derive(Serialize)]
struct Resolution {
    path: String,
    matched: Option<String>,
    channel: Option<String>,
    new_mapping: bool,
    error: Option<String>,
}

#[derive(Serialize)]
struct Report {
    active: bool,
    resolutions: Vec<Resolution>,
    registry: RegistrySnapshot,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let hook = Arc::new(build_interceptor(&config)?);
    let registry = hook.registry().clone();
    let chain = InterceptorChain::new()
        .with(hook.clone())
        .with(Arc::new(RouteMatcher::new(registry.clone())));

    let mut resolutions = Vec::new();
    for path in cli.paths {
        let mut request = PathRequest::new(path.clone());
        let error = chain.run(&mut request).err().map(|e| e.to_string());
        let binding = request.binding();

        resolutions.push(Resolution {
            path,
            matched: request.matched().map(|r| r.key().to_string()),
            channel: binding.map(|b| b.channel.id().to_string()),
            new_mapping: binding.is_some_and(|b| b.new_mapping),
            error,
        });
    }

    let report = Report {
        active: hook.is_active(),
        resolutions,
        registry: registry.snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
