//! `gantry request`: one web request through the dispatcher, no server.

use std::collections::BTreeMap;

use gantry_core::domain::{HttpMethod, Request, Response, reason_phrase};
use serde::Serialize;

use crate::{
    cli::RequestArgs,
    config::Bootstrap,
    error::{CliError, CliResult},
    output::OutputManager,
    server::{decode_path, parse_pairs},
};

/// Response as printed with `--output-format json`.
#[derive(Debug, Serialize)]
struct Exchange<'a> {
    status: u16,
    headers: BTreeMap<&'a str, &'a str>,
    body: &'a str,
}

pub fn execute(args: RequestArgs, bootstrap: &Bootstrap, output: &OutputManager) -> CliResult<u8> {
    let request = build_request(&args)?;
    let web = bootstrap.web()?;
    let response = web.handle(&request);

    if output.is_json() {
        output.json(&Exchange {
            status: response.status,
            headers: response
                .headers
                .iter()
                .map(|(n, v)| (n.as_str(), v.as_str()))
                .collect(),
            body: &response.body,
        })?;
    } else {
        if args.include {
            output.raw(&status_block(&response))?;
        }
        output.raw(&response.body)?;
        if !response.body.is_empty() && !response.body.ends_with('\n') {
            output.raw("\n")?;
        }
    }
    Ok(exit_code_for(response.status))
}

fn build_request(args: &RequestArgs) -> CliResult<Request> {
    let method: HttpMethod = args
        .method
        .parse()
        .map_err(|message| CliError::InvalidInput { message })?;

    let (path, query) = match args.path.split_once('?') {
        Some((path, query)) => (path, parse_pairs(query)),
        None => (args.path.as_str(), BTreeMap::new()),
    };
    let mut request = Request::new(method, decode_path(path));
    request.query = query;

    for pair in &args.data {
        let (key, value) = pair.split_once('=').ok_or_else(|| CliError::InvalidInput {
            message: format!("expected KEY=VALUE, got '{pair}'"),
        })?;
        request = if method.is_safe() {
            request.with_query(key, value)
        } else {
            request.with_form(key, value)
        };
    }
    for header in &args.headers {
        let (name, value) = header.split_once(':').ok_or_else(|| CliError::InvalidInput {
            message: format!("expected 'Name: value', got '{header}'"),
        })?;
        request = request.with_header(name.trim(), value.trim());
    }
    if args.json {
        request = request.with_header("accept", "application/json");
    }
    Ok(request)
}

fn status_block(response: &Response) -> String {
    let mut block = format!("HTTP {} {}\n", response.status, reason_phrase(response.status));
    for (name, value) in &response.headers {
        block.push_str(&format!("{name}: {value}\n"));
    }
    block.push('\n');
    block
}

/// 0 for success and redirects, 3 for 404, 2 for other client errors, 1 otherwise.
fn exit_code_for(status: u16) -> u8 {
    match status {
        100..=399 => 0,
        404 => 3,
        400..=499 => 2,
        _ => 1,
    }
}
