//! CRUD actions for products.

use std::collections::BTreeMap;
use std::sync::Arc;

use gantry_core::{
    application::ports::{ActionContext, CatalogRepository, Controller},
    domain::{
        ActionError, ActionResult, ActionSpec, BoundParams, CatalogValidator as validator,
        FieldErrors, HttpMethod, ParamSpec, Product, ProductWrite, format_cents,
    },
};
use tracing::info;

use super::{not_found, storage};
use crate::views;

pub struct ProductController {
    catalog: Arc<dyn CatalogRepository>,
    actions: Vec<ActionSpec>,
}

impl ProductController {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            catalog,
            actions: vec![
                ActionSpec::new("index")
                    .param(ParamSpec::int("category_id").with_default("0"))
                    .param(ParamSpec::str("format").with_default("html")),
                ActionSpec::new("view")
                    .param(ParamSpec::int("id"))
                    .param(ParamSpec::str("format").with_default("html")),
                ActionSpec::new("create").allow(&[HttpMethod::Get, HttpMethod::Post]),
                ActionSpec::new("update")
                    .param(ParamSpec::int("id"))
                    .allow(&[HttpMethod::Get, HttpMethod::Post]),
                ActionSpec::new("delete")
                    .param(ParamSpec::int("id"))
                    .allow(&[HttpMethod::Post]),
            ],
        }
    }

    fn index(
        &self,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        let filter = match params.int("category_id") {
            0 => None,
            id => Some(
                self.catalog
                    .category(id)
                    .map_err(storage)?
                    .ok_or_else(not_found)?,
            ),
        };
        let products = self
            .catalog
            .products(filter.as_ref().map(|c| c.id))
            .map_err(storage)?;

        if params.str("format") == "json" {
            return ActionResult::json(&products);
        }
        let categories = self.catalog.categories().map_err(storage)?;
        Ok(ActionResult::render(
            "product/index",
            views::product_list(ctx.config, &products, &categories, filter.as_ref()),
        ))
    }

    fn view(
        &self,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        let product = self.find(params.int("id"))?;
        if params.str("format") == "json" {
            return ActionResult::json(&product);
        }
        let category = self.catalog.category(product.category_id).map_err(storage)?;
        Ok(ActionResult::render(
            "product/view",
            views::product_view(ctx.config, &product, category.as_ref()),
        ))
    }

    fn create(&self, ctx: &ActionContext<'_>) -> Result<ActionResult, ActionError> {
        let categories = self.catalog.categories().map_err(storage)?;
        if !ctx.is_post() {
            return Ok(ActionResult::render(
                "product/create",
                views::product_form(
                    ctx.config,
                    "Create Product",
                    &ctx.url_to("product/create", &[]),
                    &BTreeMap::new(),
                    &categories,
                    &FieldErrors::new(),
                ),
            ));
        }

        let errors = match validator::product(ctx.form(), |id| categories.iter().any(|c| c.id == id)) {
            Ok(draft) => match self.catalog.insert_product(draft).map_err(storage)? {
                ProductWrite::Saved(product) => {
                    info!(id = product.id, "product created");
                    let id = product.id.to_string();
                    return Ok(ActionResult::redirect(
                        ctx.url_to("product/view", &[("id", id.as_str())]),
                    ));
                }
                ProductWrite::Missing => return Err(not_found()),
                ProductWrite::UnknownCategory => unknown_category(),
            },
            Err(errors) => errors,
        };
        Ok(ActionResult::render(
            "product/create",
            views::product_form(
                ctx.config,
                "Create Product",
                &ctx.url_to("product/create", &[]),
                ctx.form(),
                &categories,
                &errors,
            ),
        ))
    }

    fn update(
        &self,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        let product = self.find(params.int("id"))?;
        let categories = self.catalog.categories().map_err(storage)?;
        let id = product.id.to_string();
        let action = ctx.url_to("product/update", &[("id", id.as_str())]);
        let title = format!("Update Product: {}", product.name);

        if !ctx.is_post() {
            return Ok(ActionResult::render(
                "product/update",
                views::product_form(
                    ctx.config,
                    &title,
                    &action,
                    &form_values(&product),
                    &categories,
                    &FieldErrors::new(),
                ),
            ));
        }

        let errors = match validator::product(ctx.form(), |id| categories.iter().any(|c| c.id == id)) {
            Ok(draft) => match self.catalog.update_product(product.id, draft).map_err(storage)? {
                ProductWrite::Saved(_) => {
                    return Ok(ActionResult::redirect(
                        ctx.url_to("product/view", &[("id", id.as_str())]),
                    ));
                }
                ProductWrite::Missing => return Err(not_found()),
                ProductWrite::UnknownCategory => unknown_category(),
            },
            Err(errors) => errors,
        };
        Ok(ActionResult::render(
            "product/update",
            views::product_form(ctx.config, &title, &action, ctx.form(), &categories, &errors),
        ))
    }

    fn delete(
        &self,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        let id = params.int("id");
        if !self.catalog.delete_product(id).map_err(storage)? {
            return Err(not_found());
        }
        info!(id, "product deleted");
        Ok(ActionResult::redirect(ctx.url_to("product/index", &[])))
    }

    fn find(&self, id: i64) -> Result<Product, ActionError> {
        self.catalog
            .product(id)
            .map_err(storage)?
            .ok_or_else(not_found)
    }
}

/// The category vanished between validation and the write.
fn unknown_category() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.add("category_id", "Category does not exist.");
    errors
}

impl Controller for ProductController {
    fn id(&self) -> &str {
        "product"
    }

    fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    fn run(
        &self,
        action: &str,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        match action {
            "index" => self.index(ctx, params),
            "view" => self.view(ctx, params),
            "create" => self.create(ctx),
            "update" => self.update(ctx, params),
            "delete" => self.delete(ctx, params),
            other => Err(ActionError::not_found(format!("Unknown action: {other}"))),
        }
    }
}

fn form_values(product: &Product) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("name".to_string(), product.name.clone()),
        ("description".to_string(), product.description.clone()),
        ("price".to_string(), format_cents(product.price_cents)),
        ("category_id".to_string(), product.category_id.to_string()),
    ])
}
