//! Application services - orchestrate startup and dispatch.
//!
//! Startup runs loader → assembler once; the dispatchers then serve any
//! number of requests or invocations against the resulting config.

pub mod config_assembler;
pub mod console_dispatcher;
pub mod environment_loader;
pub mod web_dispatcher;

pub use config_assembler::{
    ConfigAssembler, DEFAULT_ADMIN_EMAIL, DEFAULT_CATALOG, DEFAULT_CHARSET,
    PLACEHOLDER_COOKIE_KEY, REQUIRED_KEYS,
};
pub use console_dispatcher::ConsoleDispatcher;
pub use environment_loader::EnvironmentLoader;
pub use web_dispatcher::WebDispatcher;
