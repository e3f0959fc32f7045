use gantry_core::{
    application::ports::ErrorRenderer,
    domain::{AppConfig, ErrorResponse},
};

use super::{escape, layout};

pub fn error_page(config: &AppConfig, error: &ErrorResponse) -> String {
    let content = format!(
        "<div class=\"alert\">{}</div>\n\
         <p>The above error occurred while the Web server was processing your request.</p>\n\
         <p>Please contact us if you think this is a server error. Thank you.</p>\n",
        escape(&error.message)
    );
    layout(config, &error.name, &content)
}

/// Error page renderer used when no error action is registered.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlErrorRenderer;

impl HtmlErrorRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ErrorRenderer for HtmlErrorRenderer {
    fn render(&self, error: &ErrorResponse, config: &AppConfig) -> String {
        error_page(config, error)
    }
}
