use std::collections::BTreeMap;
use std::fmt::Write as _;

use gantry_core::domain::{AppConfig, Category, FieldErrors, Product};

use super::{escape, layout, text_field};

pub fn product_list(
    config: &AppConfig,
    products: &[Product],
    categories: &[Category],
    filter: Option<&Category>,
) -> String {
    let mut content = String::new();
    if let Some(category) = filter {
        let _ = writeln!(
            content,
            "<p>Showing products in <a href=\"/category/view/{}\">{}</a>. \
             <a href=\"/product/index\">Show all</a></p>",
            category.id,
            escape(&category.name)
        );
    }
    content.push_str("<p><a href=\"/product/create\">Create Product</a></p>\n");
    if products.is_empty() {
        content.push_str("<p>No results found.</p>\n");
        return layout(config, "Products", &content);
    }

    content.push_str(
        "<table>\n<tr><th>ID</th><th>Name</th><th>Price</th><th>Category</th></tr>\n",
    );
    for product in products {
        let category = categories
            .iter()
            .find(|c| c.id == product.category_id)
            .map_or("(none)".to_string(), |c| escape(&c.name));
        let _ = writeln!(
            content,
            "<tr><td>{id}</td><td><a href=\"/product/view/{id}\">{name}</a></td>\
             <td>{price}</td><td>{category}</td></tr>",
            id = product.id,
            name = escape(&product.name),
            price = product.price_display(),
        );
    }
    content.push_str("</table>\n");
    layout(config, "Products", &content)
}

pub fn product_view(config: &AppConfig, product: &Product, category: Option<&Category>) -> String {
    let category = category.map_or("(none)".to_string(), |c| {
        format!(
            "<a href=\"/category/view/{}\">{}</a>",
            c.id,
            escape(&c.name)
        )
    });
    let content = format!(
        "<p><a href=\"/product/update/{id}\">Update</a></p>\n\
         <form method=\"post\" action=\"/product/delete/{id}\">\
         <button type=\"submit\">Delete</button></form>\n\
         <table>\n\
         <tr><th>ID</th><td>{id}</td></tr>\n\
         <tr><th>Description</th><td>{description}</td></tr>\n\
         <tr><th>Price</th><td>{price}</td></tr>\n\
         <tr><th>Category</th><td>{category}</td></tr>\n\
         <tr><th>Created</th><td>{created}</td></tr>\n\
         <tr><th>Updated</th><td>{updated}</td></tr>\n\
         </table>\n",
        id = product.id,
        description = escape(&product.description),
        price = product.price_display(),
        created = product.created_at.format("%Y-%m-%d %H:%M:%S"),
        updated = product.updated_at.format("%Y-%m-%d %H:%M:%S"),
    );
    layout(config, &product.name, &content)
}

pub fn product_form(
    config: &AppConfig,
    title: &str,
    action: &str,
    values: &BTreeMap<String, String>,
    categories: &[Category],
    errors: &FieldErrors,
) -> String {
    let value = |name: &str| values.get(name).map(String::as_str).unwrap_or_default();
    let mut content = format!("<form method=\"post\" action=\"{}\">\n", escape(action));
    text_field(&mut content, "name", "Name", value("name"), errors);
    text_field(&mut content, "description", "Description", value("description"), errors);
    text_field(&mut content, "price", "Price", value("price"), errors);

    content.push_str(
        "<p><label for=\"category_id\">Category</label>\n\
         <select id=\"category_id\" name=\"category_id\">\n",
    );
    for category in categories {
        let id = category.id.to_string();
        let selected = if value("category_id") == id {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            content,
            "<option value=\"{id}\"{selected}>{}</option>",
            escape(&category.name)
        );
    }
    content.push_str("</select>");
    if let Some(message) = errors.first("category_id") {
        let _ = write!(content, "\n<span class=\"error\">{}</span>", escape(message));
    }
    content.push_str("</p>\n<button type=\"submit\">Save</button>\n</form>\n");
    layout(config, title, &content)
}

pub fn category_list(config: &AppConfig, categories: &[Category]) -> String {
    let mut content = String::from("<p><a href=\"/category/create\">Create Category</a></p>\n");
    if categories.is_empty() {
        content.push_str("<p>No results found.</p>\n");
        return layout(config, "Categories", &content);
    }
    content.push_str("<ul>\n");
    for category in categories {
        let _ = writeln!(
            content,
            "<li><a href=\"/category/view/{}\">{}</a></li>",
            category.id,
            escape(&category.name)
        );
    }
    content.push_str("</ul>\n");
    layout(config, "Categories", &content)
}

pub fn category_view(config: &AppConfig, category: &Category, products: &[Product]) -> String {
    let mut content = format!(
        "<p><a href=\"/category/update/{id}\">Update</a></p>\n\
         <form method=\"post\" action=\"/category/delete/{id}\">\
         <button type=\"submit\">Delete</button></form>\n\
         <h2>Products</h2>\n",
        id = category.id
    );
    if products.is_empty() {
        content.push_str("<p>No products in this category.</p>\n");
    } else {
        content.push_str("<ul>\n");
        for product in products {
            let _ = writeln!(
                content,
                "<li><a href=\"/product/view/{}\">{}</a> {}</li>",
                product.id,
                escape(&product.name),
                product.price_display()
            );
        }
        content.push_str("</ul>\n");
    }
    layout(config, &category.name, &content)
}

pub fn category_form(
    config: &AppConfig,
    title: &str,
    action: &str,
    values: &BTreeMap<String, String>,
    errors: &FieldErrors,
) -> String {
    let name = values.get("name").map(String::as_str).unwrap_or_default();
    let mut content = format!("<form method=\"post\" action=\"{}\">\n", escape(action));
    text_field(&mut content, "name", "Name", name, errors);
    content.push_str("<button type=\"submit\">Save</button>\n</form>\n");
    layout(config, title, &content)
}
