pub mod action;
pub mod catalog;
pub mod config;
pub mod environment;
pub mod route;

pub use action::{
    ActionResult, ActionSpec, BoundParams, BoundValue, ConsoleOutcome, ParamKind, ParamSpec,
    Request, Response,
};
pub use catalog::{
    Category, CategoryDeletion, CategoryDraft, FieldErrors, Product, ProductDraft, ProductWrite,
};
pub use config::{
    AppConfig, AppParams, DatabaseDescriptor, LogConfig, LogTarget, LogTargetKind, PathAliases,
    SessionPolicy,
};
pub use environment::EnvironmentMap;
pub use route::{CompiledRule, RouteMatch, RouteRule};
