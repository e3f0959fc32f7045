//! Inspect the path aliases of the running configuration.

use std::fmt::Write as _;

use gantry_core::{
    application::ports::{ActionContext, Controller},
    domain::{ActionError, ActionResult, ActionSpec, BoundParams, ParamSpec},
};

pub struct AliasController {
    actions: Vec<ActionSpec>,
}

impl AliasController {
    pub fn new() -> Self {
        Self {
            actions: vec![
                ActionSpec::new("index"),
                ActionSpec::new("resolve").param(ParamSpec::str("alias")),
            ],
        }
    }
}

impl Default for AliasController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for AliasController {
    fn id(&self) -> &str {
        "alias"
    }

    fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    fn run(
        &self,
        action: &str,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        let aliases = &ctx.config.aliases;
        match action {
            "index" => {
                let mut out = String::new();
                for (name, path) in aliases.iter() {
                    let _ = writeln!(out, "{name:<10} {}", path.display());
                }
                Ok(ActionResult::Text(out))
            }
            "resolve" => {
                let alias = params.str("alias");
                aliases
                    .resolve(alias)
                    .map(|path| ActionResult::Text(path.display().to_string()))
                    .ok_or_else(|| ActionError::fault(format!("Invalid path alias: {alias}")))
            }
            other => Err(ActionError::not_found(format!("Unknown action: {other}"))),
        }
    }
}
