//! `gantry routes`: the web rule table and every registered action.

use gantry_core::domain::RouteRule;
use serde::Serialize;

use crate::{config::Bootstrap, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct RouteListing<'a> {
    rules: Vec<&'a RouteRule>,
    web: Vec<String>,
    console: Vec<String>,
}

pub fn execute(bootstrap: &Bootstrap, output: &OutputManager) -> CliResult<u8> {
    let web = bootstrap.web()?;
    let console = bootstrap.console()?;
    let listing = RouteListing {
        rules: web.router().rules().collect(),
        web: web.controllers().signatures(),
        console: console.controllers().signatures(),
    };

    if output.is_json() {
        output.json(&listing)?;
        return Ok(0);
    }

    output.header("URL rules (first match wins):")?;
    for rule in &listing.rules {
        output.raw(&format!("  {rule}\n"))?;
    }
    output.header("\nWeb actions:")?;
    for signature in &listing.web {
        output.raw(&format!("  {signature}\n"))?;
    }
    output.header("\nConsole commands:")?;
    for signature in &listing.console {
        output.raw(&format!("  {signature}\n"))?;
    }
    Ok(0)
}
