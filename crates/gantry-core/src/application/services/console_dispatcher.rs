//! Console Dispatcher - runs one command line against the console
//! controllers.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::application::{ControllerRegistry, ports::ActionContext};
use crate::domain::{
    ActionError, ActionResult, AppConfig, ConsoleOutcome, DispatchError, ExitCode, RouteError,
    Router,
};

#[derive(Debug)]
pub struct ConsoleDispatcher {
    config: Arc<AppConfig>,
    router: Router,
    controllers: ControllerRegistry,
}

impl ConsoleDispatcher {
    pub fn new(config: Arc<AppConfig>, controllers: ControllerRegistry) -> Self {
        Self {
            config,
            router: Router::empty(),
            controllers,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    /// Run `argv` (route first). Never fails; errors become exit codes.
    #[instrument(skip_all, fields(route = argv.first().map(String::as_str).unwrap_or_default()))]
    pub fn run(&self, argv: &[String]) -> ConsoleOutcome {
        match self.dispatch(argv) {
            Ok(result) => Self::outcome(result),
            Err(err) => self.fail(&err),
        }
    }

    /// Resolve and run the action without mapping errors.
    pub fn dispatch(&self, argv: &[String]) -> Result<ActionResult, DispatchError> {
        let route = self.router.parse_console(argv)?;
        let (controller, action) =
            self.controllers
                .resolve(&route)
                .ok_or_else(|| RouteError::NotFound {
                    path: route.route(),
                })?;

        let params = action.bind(&[&route.params], &route.args)?;

        debug!(route = %route.route(), params = params.len(), "running command");
        let ctx = ActionContext::new(&self.config, &self.router, &route);
        Ok(controller.run(action.id, &ctx, &params)?)
    }

    fn outcome(result: ActionResult) -> ConsoleOutcome {
        match result {
            ActionResult::Text(text) | ActionResult::Render { body: text, .. } => {
                ConsoleOutcome::ok(with_newline(text))
            }
            ActionResult::Json(value) => {
                let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                ConsoleOutcome::ok(with_newline(text))
            }
            ActionResult::Redirect { location } => ConsoleOutcome::ok(with_newline(location)),
            ActionResult::Exit(exit_code) => ConsoleOutcome {
                exit_code,
                stdout: String::new(),
                stderr: String::new(),
            },
        }
    }

    fn fail(&self, err: &DispatchError) -> ConsoleOutcome {
        if err.is_usage_error() {
            let message = match err {
                DispatchError::Route(RouteError::NotFound { path }) if path.is_empty() => {
                    "No command given.".to_string()
                }
                DispatchError::Route(RouteError::NotFound { path }) => {
                    format!("Unknown command \"{path}\".")
                }
                other => other.to_string(),
            };
            debug!(error = %err, "usage error");
            return ConsoleOutcome::failed(
                ExitCode::USAGE,
                format!("Error: {message}\n\n{}", self.controllers.usage()),
            );
        }

        let exit_code = match err {
            DispatchError::Action(ActionError::Fault {
                code: Some(code), ..
            }) => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .map_or(ExitCode::UNSPECIFIED_ERROR, ExitCode::new),
            _ => ExitCode::UNSPECIFIED_ERROR,
        };
        error!(exit_code = exit_code.code(), error = %err, "command failed");
        ConsoleOutcome::failed(exit_code, format!("Error: {err}\n"))
    }
}

fn with_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
