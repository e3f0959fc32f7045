use std::collections::BTreeMap;

use crate::domain::entities::catalog::{parse_cents, CategoryDraft, FieldErrors, ProductDraft};

/// Longest accepted name for products and categories.
pub const MAX_NAME_LEN: usize = 255;

/// Form validation for the demo catalog.
///
/// Rules live here rather than in the controllers so web and test code
/// agree on them.
pub struct CatalogValidator;

impl CatalogValidator {
    pub fn category(form: &BTreeMap<String, String>) -> Result<CategoryDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_name(form, &mut errors);
        if errors.is_empty() {
            Ok(CategoryDraft { name })
        } else {
            Err(errors)
        }
    }

    /// `category_exists` is asked once the id parses.
    pub fn product(
        form: &BTreeMap<String, String>,
        category_exists: impl Fn(i64) -> bool,
    ) -> Result<ProductDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_name(form, &mut errors);
        let description = field(form, "description").to_string();

        let price = field(form, "price");
        let price_cents = if price.is_empty() {
            errors.add("price", "Price cannot be blank.");
            0
        } else {
            parse_cents(price).unwrap_or_else(|| {
                errors.add(
                    "price",
                    "Price must be a positive amount with at most two decimals.",
                );
                0
            })
        };

        let category = field(form, "category_id");
        let category_id = match category.parse::<i64>() {
            Ok(id) if category_exists(id) => id,
            Ok(_) => {
                errors.add("category_id", "Category does not exist.");
                0
            }
            Err(_) if category.is_empty() => {
                errors.add("category_id", "Category cannot be blank.");
                0
            }
            Err(_) => {
                errors.add("category_id", "Category must be an integer.");
                0
            }
        };

        if errors.is_empty() {
            Ok(ProductDraft {
                name,
                description,
                price_cents,
                category_id,
            })
        } else {
            Err(errors)
        }
    }
}

fn field<'a>(form: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    form.get(name).map(|v| v.trim()).unwrap_or_default()
}

fn required_name(form: &BTreeMap<String, String>, errors: &mut FieldErrors) -> String {
    let name = field(form, "name");
    if name.is_empty() {
        errors.add("name", "Name cannot be blank.");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add(
            "name",
            format!("Name should contain at most {MAX_NAME_LEN} characters."),
        );
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn valid_product_form() {
        let draft = CatalogValidator::product(
            &form(&[
                ("name", " Lamp "),
                ("price", "19.9"),
                ("category_id", "1"),
            ]),
            |id| id == 1,
        )
        .unwrap();
        assert_eq!(draft.name, "Lamp");
        assert_eq!(draft.price_cents, 1990);
        assert_eq!(draft.description, "");
    }

    #[test]
    fn product_form_reports_every_field() {
        let errors = CatalogValidator::product(
            &form(&[("price", "-3"), ("category_id", "9")]),
            |_| false,
        )
        .unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("price"));
        assert_eq!(errors.first("category_id"), Some("Category does not exist."));
    }

    #[test]
    fn category_name_length_is_bounded() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(CatalogValidator::category(&form(&[("name", &long)])).is_err());
        let ok = "x".repeat(MAX_NAME_LEN);
        assert!(CatalogValidator::category(&form(&[("name", &ok)])).is_ok());
    }
}
