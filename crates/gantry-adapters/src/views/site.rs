use std::collections::BTreeMap;

use gantry_core::domain::{AppConfig, FieldErrors};

use super::{escape, layout, text_field};

pub fn home(config: &AppConfig) -> String {
    let content = format!(
        "<p>Welcome to {}.</p>\n\
         <p><a href=\"/product/index\">Browse the catalog</a></p>\n",
        escape(&config.name)
    );
    layout(config, "Home", &content)
}

pub fn about(config: &AppConfig) -> String {
    let content = format!(
        "<p>{} runs on Gantry {}.</p>\n",
        escape(&config.name),
        gantry_core::VERSION
    );
    layout(config, "About", &content)
}

pub fn contact_form(
    config: &AppConfig,
    form: &BTreeMap<String, String>,
    errors: &FieldErrors,
) -> String {
    let value = |name: &str| form.get(name).map(String::as_str).unwrap_or_default();
    let mut content = String::from("<form method=\"post\" action=\"/contact\">\n");
    text_field(&mut content, "name", "Name", value("name"), errors);
    text_field(&mut content, "email", "Email", value("email"), errors);
    text_field(&mut content, "subject", "Subject", value("subject"), errors);
    text_field(&mut content, "body", "Message", value("body"), errors);
    content.push_str("<button type=\"submit\">Send</button>\n</form>\n");
    layout(config, "Contact", &content)
}

pub fn contact_thanks(config: &AppConfig, name: &str) -> String {
    let content = format!(
        "<p>Thank you for contacting us, {}. We will respond to you as soon as possible.</p>\n\
         <p>Messages are delivered to {}.</p>\n",
        escape(name),
        escape(&config.params.admin_email)
    );
    layout(config, "Contact", &content)
}
