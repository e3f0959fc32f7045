//! The controller contract.
//!
//! A controller is a named group of actions. Each action declares its
//! parameters and accepted methods through an [`ActionSpec`]; the
//! dispatcher filters the method and binds parameters before
//! [`Controller::run`] is called, so action bodies only see valid input.

use std::collections::BTreeMap;

use crate::domain::{
    ActionError, ActionResult, ActionSpec, AppConfig, BoundParams, ErrorResponse, HttpMethod,
    Request, RouteMatch, Router,
};

static NO_FIELDS: BTreeMap<String, String> = BTreeMap::new();

/// Everything an action may read besides its bound parameters.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub config: &'a AppConfig,
    pub router: &'a Router,
    pub route: &'a RouteMatch,
    /// `None` for console invocations.
    pub request: Option<&'a Request>,
    /// Set when the action renders an error page.
    pub error: Option<&'a ErrorResponse>,
}

impl<'a> ActionContext<'a> {
    pub fn new(config: &'a AppConfig, router: &'a Router, route: &'a RouteMatch) -> Self {
        Self {
            config,
            router,
            route,
            request: None,
            error: None,
        }
    }

    pub fn with_request(mut self, request: &'a Request) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_error(mut self, error: &'a ErrorResponse) -> Self {
        self.error = Some(error);
        self
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.request.map(|r| r.method)
    }

    pub fn is_post(&self) -> bool {
        self.method() == Some(HttpMethod::Post)
    }

    /// Submitted form fields. Empty outside a web request.
    pub fn form(&self) -> &'a BTreeMap<String, String> {
        match self.request {
            Some(request) => &request.form,
            None => &NO_FIELDS,
        }
    }

    /// Query-string parameters. Empty outside a web request.
    pub fn query(&self) -> &'a BTreeMap<String, String> {
        match self.request {
            Some(request) => &request.query,
            None => &NO_FIELDS,
        }
    }

    /// Reverse-route through the configured table.
    pub fn url_to(&self, route: &str, params: &[(&str, &str)]) -> String {
        let params = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.router.create_url(route, &params)
    }
}

/// A named group of actions.
pub trait Controller: Send + Sync {
    /// Route segment naming this controller, e.g. `product`.
    fn id(&self) -> &str;

    /// Declared actions, in the order they should be listed.
    fn actions(&self) -> &[ActionSpec];

    /// Run one action. `action` is always one of [`Controller::actions`].
    fn run(
        &self,
        action: &str,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError>;

    fn action(&self, id: &str) -> Option<&ActionSpec> {
        self.actions().iter().find(|a| a.id == id)
    }
}
