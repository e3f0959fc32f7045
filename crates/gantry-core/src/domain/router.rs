//! The route table: ordered rule matching, console argument parsing and
//! reverse routing.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::entities::route::{CompiledRule, RouteMatch, RouteRule};
use crate::domain::error::RouteError;
use crate::domain::value_objects::HttpMethod;

/// Compiled, ordered route table.
///
/// Rules are tried in declaration order and the first match wins. The
/// request method never takes part in matching.
#[derive(Debug, Clone, Default)]
pub struct Router {
    rules: Vec<CompiledRule>,
}

impl Router {
    /// Compile every rule up front. One bad pattern fails the whole table.
    pub fn new(rules: &[RouteRule]) -> Result<Self, RouteError> {
        let rules = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// A router with no rules, as used by the console.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> impl Iterator<Item = &RouteRule> {
        self.rules.iter().map(CompiledRule::rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a request path.
    ///
    /// Leading and trailing `/` are ignored.
    pub fn matches(&self, path: &str, method: HttpMethod) -> Result<RouteMatch, RouteError> {
        let normalised = path.trim_matches('/');
        for compiled in &self.rules {
            if let Some(found) = compiled.match_path(normalised) {
                debug!(
                    %method,
                    path = %path,
                    rule = %compiled.rule(),
                    route = %found.route(),
                    "route matched"
                );
                return Ok(found);
            }
        }
        debug!(%method, path = %path, "no route matched");
        Err(RouteError::NotFound {
            path: path.to_string(),
        })
    }

    /// Resolve a console argument vector.
    ///
    /// The first element is the route (`controller/action` or `controller`).
    /// `--name=value` turns into a named parameter, a bare `--name` into
    /// `name=1`, and anything else is a positional argument.
    pub fn parse_console(&self, argv: &[String]) -> Result<RouteMatch, RouteError> {
        let Some((route, rest)) = argv.split_first() else {
            return Err(RouteError::NotFound {
                path: String::new(),
            });
        };
        if route.trim_matches('/').is_empty() || route.starts_with("--") {
            return Err(RouteError::NotFound {
                path: route.clone(),
            });
        }

        let mut found = RouteMatch::from_route(route);
        for arg in rest {
            match arg.strip_prefix("--") {
                Some(option) if !option.is_empty() => {
                    let (name, value) = option.split_once('=').unwrap_or((option, "1"));
                    found.params.insert(name.to_string(), value.to_string());
                }
                _ => found.args.push(arg.clone()),
            }
        }
        Ok(found)
    }

    /// Build a URL for `route` with `params`.
    ///
    /// The first rule able to produce the route wins. Parameters the path
    /// does not consume are appended as a query string. Without a matching
    /// rule the route itself is used as the path.
    pub fn create_url(&self, route: &str, params: &BTreeMap<String, String>) -> String {
        let route = route.trim_matches('/');
        let mut remaining = params.clone();

        let path = self
            .rules
            .iter()
            .find_map(|compiled| {
                let mut attempt = remaining.clone();
                let path = compiled.create_path(route, &mut attempt)?;
                remaining = attempt;
                Some(path)
            })
            .unwrap_or_else(|| route.to_string());

        let mut url = format!("/{path}");
        if !remaining.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(remaining.iter())
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}
