//! Static pages, the contact form and the error page.

use std::collections::BTreeMap;

use gantry_core::{
    application::ports::{ActionContext, Controller},
    domain::{ActionError, ActionResult, ActionSpec, BoundParams, FieldErrors, HttpMethod},
};

use crate::views;

pub struct SiteController {
    actions: Vec<ActionSpec>,
}

impl SiteController {
    pub fn new() -> Self {
        Self {
            actions: vec![
                ActionSpec::new("index"),
                ActionSpec::new("about"),
                ActionSpec::new("contact").allow(&[HttpMethod::Get, HttpMethod::Post]),
                ActionSpec::new("error"),
            ],
        }
    }

    fn contact(&self, ctx: &ActionContext<'_>) -> Result<ActionResult, ActionError> {
        let form = ctx.form();
        if !ctx.is_post() {
            return Ok(ActionResult::render(
                "site/contact",
                views::contact_form(ctx.config, form, &FieldErrors::new()),
            ));
        }

        let errors = validate_contact(form);
        if !errors.is_empty() {
            return Ok(ActionResult::render(
                "site/contact",
                views::contact_form(ctx.config, form, &errors),
            ));
        }
        let name = form.get("name").map(|n| n.trim()).unwrap_or_default();
        Ok(ActionResult::render(
            "site/contact-thanks",
            views::contact_thanks(ctx.config, name),
        ))
    }
}

impl Default for SiteController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for SiteController {
    fn id(&self) -> &str {
        "site"
    }

    fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    fn run(
        &self,
        action: &str,
        ctx: &ActionContext<'_>,
        _params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        match action {
            "index" => Ok(ActionResult::render("site/index", views::home(ctx.config))),
            "about" => Ok(ActionResult::render("site/about", views::about(ctx.config))),
            "contact" => self.contact(ctx),
            // Only meaningful when the dispatcher hands over an error.
            "error" => match ctx.error {
                Some(error) => Ok(ActionResult::render(
                    "site/error",
                    views::error_page(ctx.config, error),
                )),
                None => Err(ActionError::not_found("Page not found.")),
            },
            other => Err(ActionError::not_found(format!("Unknown action: {other}"))),
        }
    }
}

fn validate_contact(form: &BTreeMap<String, String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let field = |name: &str| form.get(name).map(|v| v.trim()).unwrap_or_default();
    for (name, label) in [
        ("name", "Name"),
        ("email", "Email"),
        ("subject", "Subject"),
        ("body", "Message"),
    ] {
        if field(name).is_empty() {
            errors.add(name, format!("{label} cannot be blank."));
        }
    }
    let email = field("email");
    if !email.is_empty() && !is_plausible_email(email) {
        errors.add("email", "Email is not a valid email address.");
    }
    errors
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_requires_all_fields() {
        let errors = validate_contact(&BTreeMap::new());
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn contact_checks_email_shape() {
        let form: BTreeMap<String, String> = [
            ("name", "Ann"),
            ("email", "ann.example.com"),
            ("subject", "Hi"),
            ("body", "Hello"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let errors = validate_contact(&form);
        assert_eq!(errors.first("email"), Some("Email is not a valid email address."));
        assert!(is_plausible_email("ann@example.com"));
    }
}
