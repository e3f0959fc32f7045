//! Infrastructure adapters for Gantry.
//!
//! This crate implements the ports defined in `gantry-core::application::ports`
//! and ships the demo controllers the `gantry` binary serves and runs.

pub mod catalog_store;
pub mod controllers;
pub mod env_source;
pub mod views;

// Re-export commonly used adapters
pub use catalog_store::{CATALOG_COMPONENT, MemoryCatalog, catalog_components};
pub use controllers::{console_controllers, web_controllers};
pub use env_source::{LocalEnvSource, MemoryEnvSource};
pub use views::HtmlErrorRenderer;
