//! The controller action contract: declared parameters, bound values,
//! requests, results and responses.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::error::{BindingError, MethodNotAllowed};
use crate::domain::value_objects::{ExitCode, HttpMethod};

// ── Declarations ─────────────────────────────────────────────────────────────

/// Type constraint for a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Int,
    Str,
}

impl ParamKind {
    const fn expected(self) -> &'static str {
        match self {
            Self::Int => "an integer",
            Self::Str => "a string",
        }
    }
}

/// One declared action parameter. No default means required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<&'static str>,
}

impl ParamSpec {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            default: None,
        }
    }

    pub const fn str(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Str,
            default: None,
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

/// An action's signature: id, parameters and accepted methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    pub id: &'static str,
    pub params: Vec<ParamSpec>,
    /// `None` accepts every method.
    pub allow: Option<Vec<HttpMethod>>,
}

impl ActionSpec {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            params: Vec::new(),
            allow: None,
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn allow(mut self, methods: &[HttpMethod]) -> Self {
        self.allow = Some(methods.to_vec());
        self
    }

    /// Method filter. Runs before binding.
    pub fn check_method(&self, method: HttpMethod) -> Result<(), MethodNotAllowed> {
        match &self.allow {
            Some(allowed) if !allowed.contains(&method) => Err(MethodNotAllowed {
                method,
                allowed: allowed.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Bind inputs to the declared parameters.
    ///
    /// Each named source is consulted in order and the first hit wins.
    /// Positional values then fill the remaining declared parameters in
    /// declaration order. All missing required parameters are reported
    /// together.
    pub fn bind(
        &self,
        sources: &[&BTreeMap<String, String>],
        positional: &[String],
    ) -> Result<BoundParams, BindingError> {
        let mut bound = BoundParams::default();
        let mut missing = Vec::new();
        let mut positional = positional.iter();

        for spec in &self.params {
            let value = sources
                .iter()
                .find_map(|s| s.get(spec.name).cloned())
                .or_else(|| positional.next().cloned())
                .or_else(|| spec.default.map(str::to_string));

            let Some(value) = value else {
                missing.push(spec.name.to_string());
                continue;
            };

            let value = match spec.kind {
                ParamKind::Int => BoundValue::Int(value.trim().parse::<i64>().map_err(|_| {
                    BindingError::InvalidParam {
                        name: spec.name.to_string(),
                        expected: spec.kind.expected(),
                    }
                })?),
                ParamKind::Str => BoundValue::Str(value),
            };
            bound.values.insert(spec.name, value);
        }

        if !missing.is_empty() {
            return Err(BindingError::MissingParams { names: missing });
        }
        bound.extra = positional.cloned().collect();
        Ok(bound)
    }
}

// ── Bound values ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    Int(i64),
    Str(String),
}

/// Parameters after binding; already type-checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundParams {
    values: BTreeMap<&'static str, BoundValue>,
    /// Positional arguments left after binding.
    pub extra: Vec<String>,
}

impl BoundParams {
    /// Integer parameter. Returns `0` for an undeclared name.
    pub fn int(&self, name: &str) -> i64 {
        match self.values.get(name) {
            Some(BoundValue::Int(n)) => *n,
            _ => 0,
        }
    }

    /// String parameter. Returns `""` for an undeclared name.
    pub fn str(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(BoundValue::Str(s)) => s,
            _ => "",
        }
    }

    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ── Requests, results, responses ─────────────────────────────────────────────

/// One inbound web request, already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: HttpMethod,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub form: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            form: BTreeMap::new(),
            headers: BTreeMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(key.into(), value.into());
        self
    }

    /// Header names are stored lower-case.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Client asked for JSON.
    pub fn wants_json(&self) -> bool {
        self.header("accept")
            .is_some_and(|accept| accept.contains("application/json"))
    }
}

/// What an action produces.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// A rendered HTML view.
    Render { view: String, body: String },
    /// Redirect to a URL.
    Redirect { location: String },
    /// Structured data sent as JSON.
    Json(serde_json::Value),
    /// Console output.
    Text(String),
    /// Console exit status with no output.
    Exit(ExitCode),
}

impl ActionResult {
    pub fn render(view: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Render {
            view: view.into(),
            body: body.into(),
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    /// Serialise any value as a JSON result.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, crate::domain::ActionError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| crate::domain::ActionError::fault(e.to_string()))
    }
}

/// A finished web response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
    }

    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(302).with_header("location", location)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Result of one console invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOutcome {
    pub exit_code: ExitCode,
    pub stdout: String,
    pub stderr: String,
}

impl ConsoleOutcome {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::OK,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: ExitCode, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn method_filter_rejects_disallowed() {
        let spec = ActionSpec::new("delete").allow(&[HttpMethod::Post]);
        assert!(spec.check_method(HttpMethod::Post).is_ok());
        let err = spec.check_method(HttpMethod::Get).unwrap_err();
        assert_eq!(err.allow(), "POST");
    }

    #[test]
    fn no_allow_list_accepts_everything() {
        let spec = ActionSpec::new("index");
        assert!(spec.check_method(HttpMethod::Delete).is_ok());
    }

    #[test]
    fn binds_typed_params_by_name() {
        let spec = ActionSpec::new("view").param(ParamSpec::int("id"));
        let bound = spec.bind(&[&map(&[("id", "42")])], &[]).unwrap();
        assert_eq!(bound.int("id"), 42);
    }

    #[test]
    fn earlier_sources_win() {
        let spec = ActionSpec::new("view").param(ParamSpec::int("id"));
        let route = map(&[("id", "1")]);
        let query = map(&[("id", "2")]);
        assert_eq!(spec.bind(&[&route, &query], &[]).unwrap().int("id"), 1);
    }

    #[test]
    fn missing_required_params_are_all_reported() {
        let spec = ActionSpec::new("x")
            .param(ParamSpec::int("id"))
            .param(ParamSpec::str("slug"))
            .param(ParamSpec::str("tab").with_default("main"));
        let err = spec.bind(&[], &[]).unwrap_err();
        assert_eq!(
            err,
            BindingError::MissingParams {
                names: vec!["id".into(), "slug".into()]
            }
        );
    }

    #[test]
    fn non_numeric_int_is_invalid() {
        let spec = ActionSpec::new("view").param(ParamSpec::int("id"));
        let err = spec.bind(&[&map(&[("id", "abc")])], &[]).unwrap_err();
        assert!(matches!(err, BindingError::InvalidParam { ref name, .. } if name == "id"));
    }

    #[test]
    fn defaults_apply_and_positional_fill_in_order() {
        let spec = ActionSpec::new("index")
            .param(ParamSpec::str("message").with_default("hello world"))
            .param(ParamSpec::int("times").with_default("1"));

        let bound = spec.bind(&[], &[]).unwrap();
        assert_eq!(bound.str("message"), "hello world");
        assert_eq!(bound.int("times"), 1);

        let args = vec!["hi".to_string(), "3".to_string(), "spare".to_string()];
        let bound = spec.bind(&[], &args).unwrap();
        assert_eq!(bound.str("message"), "hi");
        assert_eq!(bound.int("times"), 3);
        assert_eq!(bound.extra, ["spare"]);
    }

    #[test]
    fn request_wants_json_from_accept_header() {
        let req = Request::get("/").with_header("Accept", "application/json");
        assert!(req.wants_json());
        assert!(!Request::get("/").wants_json());
    }

    #[test]
    fn response_header_lookup_is_case_insensitive() {
        let resp = Response::redirect("/product/view/1");
        assert_eq!(resp.status, 302);
        assert_eq!(resp.header("Location"), Some("/product/view/1"));
    }
}
