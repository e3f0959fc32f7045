//! Core domain layer for Gantry.
//!
//! Pure logic only: parsing the environment map, describing configuration,
//! compiling and matching route rules, binding action parameters and
//! mapping errors to responses. Reading files and talking to storage is
//! left to ports defined in the application layer.
//!
//! ## Rules of the layer
//!
//! - **No async**: everything here is synchronous
//! - **No I/O**: values arrive as text or maps
//! - **Immutable config**: `AppConfig` and `EnvironmentMap` are built once
// Public API
pub mod entities;
pub mod error;
pub mod router;
pub mod validation;
pub mod value_objects;

pub use entities::{
    action::{
        ActionResult, ActionSpec, BoundParams, BoundValue, ConsoleOutcome, ParamKind, ParamSpec,
        Request, Response,
    },
    catalog::{
        format_cents, parse_cents, Category, CategoryDeletion, CategoryDraft, FieldErrors,
        Product, ProductDraft, ProductWrite,
    },
    config::{
        AppConfig, AppParams, DatabaseDescriptor, LogConfig, LogTarget, LogTargetKind,
        PathAliases, SessionPolicy, REDACTED,
    },
    environment::EnvironmentMap,
    route::{CompiledRule, RouteMatch, RouteRule},
};

pub use error::{
    reason_phrase, ActionError, BindingError, ConfigError, DispatchError, ErrorResponse,
    MethodNotAllowed, RouteError,
};

pub use router::Router;
pub use validation::{CatalogValidator, MAX_NAME_LEN};

pub use value_objects::{ConfigKind, ExitCode, Flag, HttpMethod, LogLevel, TraceLevel};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    // ========================================================================
    // Environment → routing → binding, without the application layer
    // ========================================================================

    #[test]
    fn matched_route_params_feed_binding() {
        let router = Router::new(&[RouteRule::new(
            r"<controller:(product|category)>/<action:(view|update|delete)>/<id:\d+>",
            "<controller>/<action>",
        )])
        .unwrap();
        let matched = router.matches("category/update/12", HttpMethod::Post).unwrap();

        let spec = ActionSpec::new("update")
            .param(ParamSpec::int("id"))
            .allow(&[HttpMethod::Get, HttpMethod::Post]);
        spec.check_method(HttpMethod::Post).unwrap();

        let query = BTreeMap::from([("id".to_string(), "99".to_string())]);
        let bound = spec.bind(&[&matched.params, &query], &[]).unwrap();
        assert_eq!(bound.int("id"), 12);
    }

    #[test]
    fn binding_failure_maps_to_bad_request_response() {
        let spec = ActionSpec::new("view").param(ParamSpec::int("id"));
        let err: DispatchError = spec.bind(&[], &[]).unwrap_err().into();
        let resp = err.to_response();
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.name, "Bad Request");
        assert!(err.is_usage_error());
    }

    #[test]
    fn env_flag_drives_trace_level() {
        let env = EnvironmentMap::parse("APP_DEBUG=yes");
        let debug: Flag = env.get("APP_DEBUG").unwrap_or("0").parse().unwrap();
        assert_eq!(TraceLevel::from_debug(debug.0), TraceLevel::Full);
    }
}
