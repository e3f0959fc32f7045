//! Application ports (traits) for external dependencies.
//!
//! Adapters in `gantry-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by services, implemented by infrastructure
//!   - `EnvSource`: reading the environment file
//!   - `CatalogRepository`: demo catalog storage
//!   - `ErrorRenderer`: fallback error pages
//!
//! - **Handler Ports**: called by the dispatchers, implemented per feature
//!   - `Controller`: a named group of actions

pub mod controller;
pub mod output;

pub use controller::{ActionContext, Controller};
pub use output::{CatalogRepository, EnvSource, ErrorRenderer};
