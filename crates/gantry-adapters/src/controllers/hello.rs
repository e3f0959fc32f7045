use gantry_core::{
    application::ports::{ActionContext, Controller},
    domain::{ActionError, ActionResult, ActionSpec, BoundParams, ParamSpec},
};

/// Echoes its first argument.
pub struct HelloController {
    actions: Vec<ActionSpec>,
}

impl HelloController {
    pub fn new() -> Self {
        Self {
            actions: vec![
                ActionSpec::new("index")
                    .param(ParamSpec::str("message").with_default("hello world")),
            ],
        }
    }
}

impl Default for HelloController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for HelloController {
    fn id(&self) -> &str {
        "hello"
    }

    fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    fn run(
        &self,
        _action: &str,
        _ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        Ok(ActionResult::Text(params.str("message").to_string()))
    }
}
