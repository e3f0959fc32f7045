//! Plain string HTML views.
//!
//! Every interpolated value goes through [`escape`]. Views return the full
//! page, wrapped in [`layout`].

mod catalog;
mod error;
mod site;

use std::fmt::Write as _;

use gantry_core::domain::{AppConfig, FieldErrors};

pub use catalog::{
    category_form, category_list, category_view, product_form, product_list, product_view,
};
pub use error::{HtmlErrorRenderer, error_page};
pub use site::{about, contact_form, contact_thanks, home};

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap `content` in the site chrome. `content` must already be escaped.
pub fn layout(config: &AppConfig, title: &str, content: &str) -> String {
    let app = escape(&config.name);
    let title = escape(title);
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n<meta charset=\"utf-8\">\n<title>{title} - {app}</title>\n</head>\n\
         <body>\n\
         <nav><a href=\"/\">{app}</a> | <a href=\"/product/index\">Products</a> | \
         <a href=\"/category/index\">Categories</a> | <a href=\"/about\">About</a> | \
         <a href=\"/contact\">Contact</a></nav>\n\
         <main>\n<h1>{title}</h1>\n{content}</main>\n\
         <footer>&copy; {app}</footer>\n\
         </body>\n</html>\n"
    )
}

/// A text input with the first validation message for its field.
pub(crate) fn text_field(
    out: &mut String,
    name: &str,
    label: &str,
    value: &str,
    errors: &FieldErrors,
) {
    let _ = write!(
        out,
        "<p><label for=\"{name}\">{label}</label>\n\
         <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\">",
        escape(value)
    );
    if let Some(message) = errors.first(name) {
        let _ = write!(out, "\n<span class=\"error\">{}</span>", escape(message));
    }
    out.push_str("</p>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn text_field_renders_first_error() {
        let mut errors = FieldErrors::new();
        errors.add("name", "Name cannot be blank.");
        let mut out = String::new();
        text_field(&mut out, "name", "Name", "<b>", &errors);
        assert!(out.contains("value=\"&lt;b&gt;\""));
        assert!(out.contains("Name cannot be blank."));
    }
}
