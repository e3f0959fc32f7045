//! Web Dispatcher - turns one [`Request`] into one [`Response`].
//!
//! Order of checks:
//! 1. route match (404)
//! 2. controller and action lookup (404)
//! 3. method filter (405, with `Allow`)
//! 4. parameter binding (400)
//! 5. the action itself
//!
//! Every failure is converted to an error response here; nothing
//! propagates to the host.

use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use crate::application::{ControllerRegistry, ports::{ActionContext, ErrorRenderer}};
use crate::domain::{
    ActionResult, AppConfig, BoundParams, DispatchError, ErrorResponse, Request, Response,
    RouteError, RouteMatch, Router,
};

pub struct WebDispatcher {
    config: Arc<AppConfig>,
    router: Router,
    controllers: ControllerRegistry,
    error_renderer: Box<dyn ErrorRenderer>,
}

impl std::fmt::Debug for WebDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDispatcher")
            .field("app", &self.config.id)
            .field("rules", &self.router.len())
            .field("controllers", &self.controllers)
            .finish_non_exhaustive()
    }
}

impl WebDispatcher {
    /// Compile the config's route table and take ownership of the controllers.
    pub fn new(
        config: Arc<AppConfig>,
        controllers: ControllerRegistry,
        error_renderer: Box<dyn ErrorRenderer>,
    ) -> Result<Self, RouteError> {
        let router = Router::new(&config.routes)?;
        Ok(Self {
            config,
            router,
            controllers,
            error_renderer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    /// Handle one request. Never fails; errors become error pages.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub fn handle(&self, request: &Request) -> Response {
        match self.dispatch(request) {
            Ok(result) => Self::respond(result),
            Err(err) => self.fail(request, &err),
        }
    }

    /// Resolve and run the action without rendering errors.
    pub fn dispatch(&self, request: &Request) -> Result<ActionResult, DispatchError> {
        let route = self.router.matches(&request.path, request.method)?;
        let (controller, action) =
            self.controllers
                .resolve(&route)
                .ok_or_else(|| RouteError::NotFound {
                    path: request.path.clone(),
                })?;

        action.check_method(request.method)?;
        let params = action.bind(&[&route.params, &request.query, &request.form], &[])?;

        debug!(route = %route.route(), params = params.len(), "running action");
        let ctx = ActionContext::new(&self.config, &self.router, &route).with_request(request);
        Ok(controller.run(action.id, &ctx, &params)?)
    }

    fn respond(result: ActionResult) -> Response {
        match result {
            ActionResult::Render { body, .. } => Response::html(200, body),
            ActionResult::Redirect { location } => Response::redirect(location),
            ActionResult::Json(value) => Response::json(200, value.to_string()),
            ActionResult::Text(text) => Response::new(200)
                .with_header("content-type", "text/plain; charset=utf-8")
                .with_body(text),
            ActionResult::Exit(code) if code.is_success() => Response::new(204),
            ActionResult::Exit(_) => Response::new(500),
        }
    }

    fn fail(&self, request: &Request, err: &DispatchError) -> Response {
        let status = err.status_code();
        if status >= 500 {
            error!(status, error = %err, "request failed");
        } else {
            debug!(status, error = %err, "request rejected");
        }

        let body = err.to_response();
        let mut response = if request.wants_json() {
            Response::json(status, serde_json::to_string(&body).unwrap_or_default())
        } else {
            Response::html(status, self.render_error(request, &body))
        };
        if let DispatchError::MethodNotAllowed(method) = err {
            response = response.with_header("allow", method.allow());
        }
        response
    }

    /// The configured error action renders the page when it can; the
    /// renderer port covers everything else.
    fn render_error(&self, request: &Request, error: &ErrorResponse) -> String {
        if let Some(route) = &self.config.error_action {
            let matched = RouteMatch::from_route(route);
            if let Some((controller, action)) = self.controllers.resolve(&matched) {
                let ctx = ActionContext::new(&self.config, &self.router, &matched)
                    .with_request(request)
                    .with_error(error);
                match controller.run(action.id, &ctx, &BoundParams::default()) {
                    Ok(ActionResult::Render { body, .. }) => return body,
                    Ok(_) => warn!(route = %route, "error action did not render a page"),
                    Err(e) => warn!(route = %route, error = %e, "error action failed"),
                }
            }
        }
        self.error_renderer.render(error, &self.config)
    }
}
