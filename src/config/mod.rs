//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → lifecycle::startup builds registry + interceptor from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the registration set is read once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    InjectionConfig, ListenerConfig, ObservabilityConfig, RemapConfig, RouteConfig, ServiceConfig,
    StrategyKind,
};
pub use validation::{validate_config, ValidationError};
