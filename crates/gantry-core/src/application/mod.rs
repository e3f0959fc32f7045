//! Application layer for Gantry.
//!
//! This layer contains:
//! - **Services**: startup and dispatch orchestration (EnvironmentLoader,
//!   ConfigAssembler, WebDispatcher, ConsoleDispatcher)
//! - **Ports**: traits for the environment source, storage, error pages and
//!   controllers
//! - **Registries**: explicit controller and component registration
//! - **Errors**: application-specific error types
//!
//! Routing, binding and error mapping rules live in `crate::domain`; this
//! layer only sequences them.

pub mod error;
pub mod ports;
pub mod registry;
pub mod services;

pub use services::{ConfigAssembler, ConsoleDispatcher, EnvironmentLoader, WebDispatcher};

pub use ports::{ActionContext, CatalogRepository, Controller, EnvSource, ErrorRenderer};

pub use registry::{ComponentRegistry, Constructor, ControllerRegistry};

pub use error::ApplicationError;
