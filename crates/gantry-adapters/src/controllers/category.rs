//! CRUD actions for categories.

use std::collections::BTreeMap;
use std::sync::Arc;

use gantry_core::{
    application::ports::{ActionContext, CatalogRepository, Controller},
    domain::{
        ActionError, ActionResult, ActionSpec, BoundParams, CatalogValidator as validator,
        Category, CategoryDeletion, FieldErrors, HttpMethod, ParamSpec,
    },
};
use tracing::info;

use super::{not_found, storage};
use crate::views;

pub struct CategoryController {
    catalog: Arc<dyn CatalogRepository>,
    actions: Vec<ActionSpec>,
}

impl CategoryController {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            catalog,
            actions: vec![
                ActionSpec::new("index"),
                ActionSpec::new("view").param(ParamSpec::int("id")),
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

    fn view(
        &self,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        let category = self.find(params.int("id"))?;
        let products = self
            .catalog
            .products(Some(category.id))
            .map_err(storage)?;
        Ok(ActionResult::render(
            "category/view",
            views::category_view(ctx.config, &category, &products),
        ))
    }

    fn create(&self, ctx: &ActionContext<'_>) -> Result<ActionResult, ActionError> {
        let action = ctx.url_to("category/create", &[]);
        if !ctx.is_post() {
            return Ok(ActionResult::render(
                "category/create",
                views::category_form(
                    ctx.config,
                    "Create Category",
                    &action,
                    &BTreeMap::new(),
                    &FieldErrors::new(),
                ),
            ));
        }

        match validator::category(ctx.form()) {
            Ok(draft) => {
                let category = self.catalog.insert_category(draft).map_err(storage)?;
                info!(id = category.id, "category created");
                let id = category.id.to_string();
                Ok(ActionResult::redirect(
                    ctx.url_to("category/view", &[("id", id.as_str())]),
                ))
            }
            Err(errors) => Ok(ActionResult::render(
                "category/create",
                views::category_form(ctx.config, "Create Category", &action, ctx.form(), &errors),
            )),
        }
    }

    fn update(
        &self,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        let category = self.find(params.int("id"))?;
        let id = category.id.to_string();
        let action = ctx.url_to("category/update", &[("id", id.as_str())]);
        let title = format!("Update Category: {}", category.name);

        if !ctx.is_post() {
            let values = BTreeMap::from([("name".to_string(), category.name.clone())]);
            return Ok(ActionResult::render(
                "category/update",
                views::category_form(ctx.config, &title, &action, &values, &FieldErrors::new()),
            ));
        }

        match validator::category(ctx.form()) {
            Ok(draft) => {
                self.catalog
                    .update_category(category.id, draft)
                    .map_err(storage)?
                    .ok_or_else(not_found)?;
                Ok(ActionResult::redirect(
                    ctx.url_to("category/view", &[("id", id.as_str())]),
                ))
            }
            Err(errors) => Ok(ActionResult::render(
                "category/update",
                views::category_form(ctx.config, &title, &action, ctx.form(), &errors),
            )),
        }
    }

    fn delete(
        &self,
        ctx: &ActionContext<'_>,
        params: &BoundParams,
    ) -> Result<ActionResult, ActionError> {
        let category = self.find(params.int("id"))?;
        match self.catalog.delete_category(category.id).map_err(storage)? {
            CategoryDeletion::Deleted => {
                info!(id = category.id, "category deleted");
                Ok(ActionResult::redirect(ctx.url_to("category/index", &[])))
            }
            CategoryDeletion::Missing => Err(not_found()),
            CategoryDeletion::InUse { products } => Err(ActionError::conflict(format!(
                "Category \"{}\" still has {products} product(s) and cannot be deleted.",
                category.name
            ))),
        }
    }

    fn find(&self, id: i64) -> Result<Category, ActionError> {
        self.catalog
            .category(id)
            .map_err(storage)?
            .ok_or_else(not_found)
    }
}

impl Controller for CategoryController {
    fn id(&self) -> &str {
        "category"
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
            "index" => {
                let categories = self.catalog.categories().map_err(storage)?;
                Ok(ActionResult::render(
                    "category/index",
                    views::category_list(ctx.config, &categories),
                ))
            }
            "view" => self.view(ctx, params),
            "create" => self.create(ctx),
            "update" => self.update(ctx, params),
            "delete" => self.delete(ctx, params),
            other => Err(ActionError::not_found(format!("Unknown action: {other}"))),
        }
    }
}
