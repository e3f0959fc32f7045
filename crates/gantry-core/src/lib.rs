//! Gantry Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Gantry, a small
//! MVC application core: environment-driven configuration, an ordered route
//! table and controller/action dispatch for a web and a console entry point.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        gantry-cli (CLI, web host)       │
//! │     run / serve / request / routes      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  EnvironmentLoader → ConfigAssembler    │
//! │  WebDispatcher, ConsoleDispatcher       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ EnvSource, CatalogRepository, Controller│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   gantry-adapters (Infrastructure)      │
//! │  LocalEnvSource, MemoryCatalog, demo    │
//! │  controllers, HTML views                │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ EnvironmentMap, AppConfig, Router,      │
//! │ ActionSpec, DispatchError               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gantry_core::prelude::*;
//!
//! # fn wire(source: Box<dyn EnvSource>, controllers: ControllerRegistry,
//! #         renderer: Box<dyn ErrorRenderer>) -> GantryResult<()> {
//! // 1. Load the environment once
//! let env = EnvironmentLoader::new(source).load(".env".as_ref())?;
//!
//! // 2. Assemble the immutable config
//! let config = Arc::new(ConfigAssembler::build_web(&env)?);
//!
//! // 3. Dispatch requests
//! let web = WebDispatcher::new(config, controllers, renderer)?;
//! let response = web.handle(&Request::get("/product/view/1"));
//! assert!(response.status < 600);
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ActionContext, ApplicationError, CatalogRepository, ComponentRegistry, ConfigAssembler,
        ConsoleDispatcher, Controller, ControllerRegistry, EnvSource, EnvironmentLoader,
        ErrorRenderer, WebDispatcher,
    };
    pub use crate::domain::{
        ActionError, ActionResult, ActionSpec, AppConfig, BoundParams, ConfigError,
        ConsoleOutcome, DispatchError, EnvironmentMap, ErrorResponse, ExitCode, HttpMethod,
        ParamSpec, Request, Response, RouteMatch, RouteRule, Router,
    };
    pub use crate::error::{GantryError, GantryResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
