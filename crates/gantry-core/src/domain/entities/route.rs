//! Route rules: declarative `(pattern, target)` pairs and their compiled form.
//!
//! # Pattern syntax
//!
//! ```text
//! product/view/<id:\d+>            literal segments + typed placeholder
//! <controller:[\w-]+>/<action>      untyped placeholder matches one segment
//! ""                                the site root
//! ```
//!
//! A target is a route template such as `product/view` or
//! `<controller>/<action>`. Placeholders referenced by the target are
//! consumed by it; the rest become action parameters.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::RouteError;

/// Constraint applied to a placeholder that declares none.
const DEFAULT_CONSTRAINT: &str = "[^/]+";

/// A declared rule, as stored in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    pub pattern: String,
    pub target: String,
}

impl RouteRule {
    pub fn new(pattern: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for RouteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = if self.pattern.is_empty() {
            "/"
        } else {
            &self.pattern
        };
        write!(f, "{pattern} => {}", self.target)
    }
}

/// Result of resolving a request path or console argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteMatch {
    pub controller: String,
    pub action: String,
    pub params: BTreeMap<String, String>,
    /// Console positional arguments, in order.
    pub args: Vec<String>,
}

impl RouteMatch {
    /// Split a `controller/action` route. A single segment means the
    /// controller's `index` action.
    pub fn from_route(route: &str) -> Self {
        let route = route.trim_matches('/');
        let (controller, action) = match route.rsplit_once('/') {
            Some((c, a)) if !a.is_empty() => (c, a),
            Some((c, _)) => (c, "index"),
            None => (route, "index"),
        };
        Self {
            controller: controller.to_string(),
            action: action.to_string(),
            ..Self::default()
        }
    }

    /// `controller/action`.
    pub fn route(&self) -> String {
        format!("{}/{}", self.controller, self.action)
    }
}

/// One piece of a parsed pattern or target template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Placeholder { name: String, constraint: String },
}

/// A rule compiled for matching and URL creation.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: RouteRule,
    matcher: Regex,
    pattern_tokens: Vec<Token>,
    target_tokens: Vec<Token>,
}

impl CompiledRule {
    pub fn compile(rule: &RouteRule) -> Result<Self, RouteError> {
        let pattern_tokens = tokenize(rule.pattern.trim_matches('/'), &rule.pattern)?;
        let target_tokens = tokenize(rule.target.trim_matches('/'), &rule.target)?;

        // Every placeholder the target references must be captured by the pattern.
        for token in &target_tokens {
            if let Token::Placeholder { name, .. } = token {
                if constraint_for(&pattern_tokens, name).is_none() {
                    return Err(RouteError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        reason: format!("target references unknown placeholder <{name}>"),
                    });
                }
            }
        }

        let matcher = Regex::new(&anchored(&pattern_tokens)).map_err(|e| {
            RouteError::InvalidPattern {
                pattern: rule.pattern.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            rule: rule.clone(),
            matcher,
            pattern_tokens,
            target_tokens,
        })
    }

    pub fn rule(&self) -> &RouteRule {
        &self.rule
    }

    /// Match a normalised path (no leading or trailing `/`).
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let caps = self.matcher.captures(path)?;

        let mut params = BTreeMap::new();
        for token in &self.pattern_tokens {
            if let Token::Placeholder { name, .. } = token {
                if let Some(m) = caps.name(name) {
                    params.insert(name.clone(), m.as_str().to_string());
                }
            }
        }

        let mut route = String::new();
        for token in &self.target_tokens {
            match token {
                Token::Literal(text) => route.push_str(text),
                Token::Placeholder { name, .. } => {
                    // Consumed by the route; not an action parameter.
                    let value = params.remove(name).unwrap_or_default();
                    route.push_str(&value);
                }
            }
        }

        let mut matched = RouteMatch::from_route(&route);
        matched.params = params;
        Some(matched)
    }

    /// Build a path for `route` if this rule can produce it.
    ///
    /// Consumed parameters are removed from `params`; the caller turns the
    /// leftovers into a query string.
    pub fn create_path(&self, route: &str, params: &mut BTreeMap<String, String>) -> Option<String> {
        let mut values = self.match_target(route)?;

        // Pattern placeholders not bound by the target must come from params
        // and satisfy their constraint.
        for token in &self.pattern_tokens {
            let Token::Placeholder { name, constraint } = token else {
                continue;
            };
            if values.contains_key(name) {
                continue;
            }
            let value = params.get(name)?;
            let check = Regex::new(&format!("^(?:{constraint})$")).ok()?;
            if !check.is_match(value) {
                return None;
            }
            values.insert(name.clone(), value.clone());
        }

        let mut path = String::new();
        for token in &self.pattern_tokens {
            match token {
                Token::Literal(text) => path.push_str(text),
                Token::Placeholder { name, .. } => {
                    path.push_str(values.get(name).map(String::as_str).unwrap_or_default());
                }
            }
        }

        for token in &self.pattern_tokens {
            if let Token::Placeholder { name, .. } = token {
                params.remove(name);
            }
        }
        Some(path)
    }

    /// Match a route string against the target template, binding the
    /// placeholders it references.
    fn match_target(&self, route: &str) -> Option<BTreeMap<String, String>> {
        let mut regex = String::from("^");
        for token in &self.target_tokens {
            match token {
                Token::Literal(text) => regex.push_str(&regex::escape(text)),
                Token::Placeholder { name, .. } => {
                    let constraint = constraint_for(&self.pattern_tokens, name)?;
                    regex.push_str(&format!("(?P<{name}>{constraint})"));
                }
            }
        }
        regex.push('$');

        let target = Regex::new(&regex).ok()?;
        let route = normalise_route(route);
        let caps = target.captures(&route)?;

        let mut values = BTreeMap::new();
        for token in &self.target_tokens {
            if let Token::Placeholder { name, .. } = token {
                values.insert(name.clone(), caps.name(name)?.as_str().to_string());
            }
        }
        Some(values)
    }
}

/// `controller` and `controller/` both mean `controller/index`.
fn normalise_route(route: &str) -> String {
    let m = RouteMatch::from_route(route);
    m.route()
}

fn constraint_for<'a>(tokens: &'a [Token], name: &str) -> Option<&'a str> {
    tokens.iter().find_map(|t| match t {
        Token::Placeholder { name: n, constraint } if n == name => Some(constraint.as_str()),
        _ => None,
    })
}

fn anchored(tokens: &[Token]) -> String {
    let mut regex = String::from("^");
    for token in tokens {
        match token {
            Token::Literal(text) => regex.push_str(&regex::escape(text)),
            Token::Placeholder { name, constraint } => {
                regex.push_str(&format!("(?P<{name}>{constraint})"));
            }
        }
    }
    regex.push('$');
    regex
}

fn tokenize(text: &str, original: &str) -> Result<Vec<Token>, RouteError> {
    let invalid = |reason: &str| RouteError::InvalidPattern {
        pattern: original.to_string(),
        reason: reason.to_string(),
    };

    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            literal.push(c);
            continue;
        }

        let mut body = String::new();
        let mut closed = false;
        let mut escaped = false;
        for c in chars.by_ref() {
            if c == '>' && !escaped {
                closed = true;
                break;
            }
            escaped = c == '\\' && !escaped;
            body.push(c);
        }
        if !closed {
            return Err(invalid("unterminated placeholder"));
        }

        let (name, constraint) = match body.split_once(':') {
            Some((n, c)) => (n.trim(), c.trim()),
            None => (body.trim(), DEFAULT_CONSTRAINT),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("placeholder names must be alphanumeric"));
        }
        if constraint.is_empty() {
            return Err(invalid("empty placeholder constraint"));
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Placeholder {
            name: name.to_string(),
            constraint: constraint.to_string(),
        });
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}
