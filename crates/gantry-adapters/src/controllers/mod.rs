//! Demo controllers and their registration.
//!
//! Web: `site`, `product`, `category`. Console: `hello`, `alias`.

mod alias;
mod category;
mod hello;
mod product;
mod site;

use std::sync::Arc;

use gantry_core::{
    application::{ApplicationError, ControllerRegistry, ports::CatalogRepository},
    domain::ActionError,
    error::GantryError,
};

pub use alias::AliasController;
pub use category::CategoryController;
pub use hello::HelloController;
pub use product::ProductController;
pub use site::SiteController;

/// Message shown for rows that do not exist.
pub const NOT_FOUND_MESSAGE: &str = "The requested page does not exist.";

/// Controllers served by the web entry point.
pub fn web_controllers(
    catalog: Arc<dyn CatalogRepository>,
) -> Result<ControllerRegistry, ApplicationError> {
    ControllerRegistry::new()
        .with(Box::new(SiteController::new()))?
        .with(Box::new(ProductController::new(Arc::clone(&catalog))))?
        .with(Box::new(CategoryController::new(catalog)))
}

/// Controllers run by the console entry point.
pub fn console_controllers() -> Result<ControllerRegistry, ApplicationError> {
    ControllerRegistry::new()
        .with(Box::new(HelloController::new()))?
        .with(Box::new(AliasController::new()))
}

pub(crate) fn not_found() -> ActionError {
    ActionError::not_found(NOT_FOUND_MESSAGE)
}

pub(crate) fn storage(err: GantryError) -> ActionError {
    ActionError::fault(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog_store::MemoryCatalog, views::HtmlErrorRenderer};
    use gantry_core::{
        application::{ConfigAssembler, ConsoleDispatcher, WebDispatcher},
        domain::{
            Category, CategoryDeletion, CategoryDraft, EnvironmentMap, ErrorResponse, ExitCode,
            Product, ProductDraft, ProductWrite, Request,
        },
        error::GantryResult,
    };
    use mockall::mock;

    const ENV: &str = "\
APP_ID=shop
APP_NAME=Shop
DB_DRIVER=mysql
DB_HOST=localhost
DB_PORT=3306
DB_NAME=shop
DB_USER=shop
DB_PASSWORD=secret
";

    mock! {
        pub Repo {}

        impl CatalogRepository for Repo {
            fn categories(&self) -> GantryResult<Vec<Category>>;
            fn category(&self, id: i64) -> GantryResult<Option<Category>>;
            fn insert_category(&self, draft: CategoryDraft) -> GantryResult<Category>;
            fn update_category(&self, id: i64, draft: CategoryDraft) -> GantryResult<Option<Category>>;
            fn delete_category(&self, id: i64) -> GantryResult<CategoryDeletion>;
            fn products(&self, category_id: Option<i64>) -> GantryResult<Vec<Product>>;
            fn product(&self, id: i64) -> GantryResult<Option<Product>>;
            fn insert_product(&self, draft: ProductDraft) -> GantryResult<ProductWrite>;
            fn update_product(&self, id: i64, draft: ProductDraft) -> GantryResult<ProductWrite>;
            fn delete_product(&self, id: i64) -> GantryResult<bool>;
        }
    }

    fn web_with(catalog: Arc<dyn CatalogRepository>) -> WebDispatcher {
        let env = EnvironmentMap::parse(ENV).with_origin("/srv/shop/.env");
        let config = Arc::new(ConfigAssembler::build_web(&env).unwrap());
        WebDispatcher::new(
            config,
            web_controllers(catalog).unwrap(),
            Box::new(HtmlErrorRenderer::new()),
        )
        .unwrap()
    }

    fn web() -> (WebDispatcher, MemoryCatalog) {
        let catalog = MemoryCatalog::with_demo_data();
        (web_with(Arc::new(catalog.clone())), catalog)
    }

    fn console() -> ConsoleDispatcher {
        let env = EnvironmentMap::parse(ENV).with_origin("/srv/shop/.env");
        let config = Arc::new(ConfigAssembler::build_console(&env).unwrap());
        ConsoleDispatcher::new(config, console_controllers().unwrap())
    }

    fn json_error(body: &str) -> ErrorResponse {
        serde_json::from_str(body).unwrap()
    }

    // ── site ─────────────────────────────────────────────────────────────

    #[test]
    fn site_pages_render() {
        let (web, _) = web();
        let home = web.handle(&Request::get("/"));
        assert_eq!(home.status, 200);
        assert!(home.body.contains("<title>Home - Shop</title>"));
        assert_eq!(web.handle(&Request::get("/about")).status, 200);
        assert!(web.handle(&Request::get("/contact")).body.contains("<form"));
    }

    #[test]
    fn contact_post_thanks_or_reports_errors() {
        let (web, _) = web();
        let bad = web.handle(&Request::post("/contact").with_form("name", "Ann"));
        assert_eq!(bad.status, 200);
        assert!(bad.body.contains("Email cannot be blank."));

        let good = web.handle(
            &Request::post("/contact")
                .with_form("name", "Ann")
                .with_form("email", "ann@example.com")
                .with_form("subject", "Hi")
                .with_form("body", "Hello"),
        );
        assert!(good.body.contains("Thank you for contacting us, Ann."));
    }

    #[test]
    fn error_pages_go_through_site_error() {
        let (web, _) = web();
        let response = web.handle(&Request::get("/product/view/999"));
        assert_eq!(response.status, 404);
        assert!(response.body.contains("<title>Not Found - Shop</title>"));
        assert!(response.body.contains(NOT_FOUND_MESSAGE));

        // reached directly there is no error to show
        assert_eq!(web.handle(&Request::get("/site/error")).status, 404);
    }

    // ── product ──────────────────────────────────────────────────────────

    #[test]
    fn product_index_lists_and_filters() {
        let (web, _) = web();
        let all = web.handle(&Request::get("/product/index"));
        assert!(all.body.contains("The Rust Book"));
        assert!(all.body.contains("Claw Hammer"));

        let tools = web.handle(&Request::get("/product").with_query("category_id", "2"));
        assert!(!tools.body.contains("The Rust Book"));
        assert!(tools.body.contains("Torque Wrench"));

        let missing = web.handle(&Request::get("/product").with_query("category_id", "42"));
        assert_eq!(missing.status, 404);
    }

    #[test]
    fn product_json_format() {
        let (web, _) = web();
        let response = web.handle(&Request::get("/product/view/1").with_query("format", "json"));
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("application/json"));
        let product: Product = serde_json::from_str(&response.body).unwrap();
        assert_eq!(product.name, "The Rust Book");

        let list = web.handle(&Request::get("/product/index").with_query("format", "json"));
        let products: Vec<Product> = serde_json::from_str(&list.body).unwrap();
        assert_eq!(products.len(), 3);
    }

    #[test]
    fn product_view_rejects_bad_ids() {
        let (web, _) = web();
        // non-numeric ids never reach the typed rule or the action
        assert_eq!(web.handle(&Request::get("/product/view/abc")).status, 404);
        let response = web.handle(
            &Request::get("/product/view")
                .with_query("id", "abc")
                .with_header("accept", "application/json"),
        );
        assert_eq!(response.status, 400);
        assert_eq!(json_error(&response.body).name, "Bad Request");
    }

    #[test]
    fn product_create_redirects_to_view() {
        let (web, catalog) = web();
        let response = web.handle(
            &Request::post("/product/create")
                .with_form("name", "Rake")
                .with_form("price", "12.5")
                .with_form("category_id", "3"),
        );
        assert_eq!(response.status, 302);
        assert_eq!(response.header("location"), Some("/product/view/4"));
        assert_eq!(catalog.product_count(), 4);
    }

    #[test]
    fn product_create_invalid_rerenders_form() {
        let (web, catalog) = web();
        let response = web.handle(
            &Request::post("/product/create")
                .with_form("name", "")
                .with_form("price", "abc")
                .with_form("category_id", "77"),
        );
        assert_eq!(response.status, 200);
        assert!(response.body.contains("Name cannot be blank."));
        assert!(response.body.contains("Category does not exist."));
        assert_eq!(catalog.product_count(), 3);
    }

    #[test]
    fn product_update_saves_changes() {
        let (web, catalog) = web();
        let form = web.handle(&Request::get("/product/update/2"));
        assert!(form.body.contains("value=\"14.50\""));

        let response = web.handle(
            &Request::post("/product/update/2")
                .with_form("name", "Framing Hammer")
                .with_form("price", "20")
                .with_form("category_id", "2"),
        );
        assert_eq!(response.header("location"), Some("/product/view/2"));
        let product = catalog.product(2).unwrap().unwrap();
        assert_eq!(product.name, "Framing Hammer");
        assert_eq!(product.price_cents, 2000);
    }

    #[test]
    fn product_delete_is_post_only() {
        let (web, catalog) = web();
        let get = web.handle(&Request::get("/product/delete/1"));
        assert_eq!(get.status, 405);
        assert_eq!(get.header("allow"), Some("POST"));
        assert_eq!(catalog.product_count(), 3);

        let post = web.handle(&Request::post("/product/delete/1"));
        assert_eq!(post.status, 302);
        assert_eq!(post.header("location"), Some("/product/index"));
        assert_eq!(catalog.product_count(), 2);

        assert_eq!(web.handle(&Request::post("/product/delete/1")).status, 404);
    }

    // ── category ─────────────────────────────────────────────────────────

    #[test]
    fn category_view_lists_its_products() {
        let (web, _) = web();
        let response = web.handle(&Request::get("/category/view/2"));
        assert!(response.body.contains("Claw Hammer"));
        assert!(!response.body.contains("The Rust Book"));
    }

    #[test]
    fn category_delete_refused_while_in_use() {
        let (web, catalog) = web();
        let response = web.handle(
            &Request::post("/category/delete/2").with_header("Accept", "application/json"),
        );
        assert_eq!(response.status, 409);
        let error = json_error(&response.body);
        assert_eq!(error.name, "Conflict");
        assert!(error.message.contains("still has 2 product(s)"));

        let empty = web.handle(&Request::post("/category/delete/3"));
        assert_eq!(empty.status, 302);
        assert_eq!(catalog.categories().unwrap().len(), 2);
    }

    #[test]
    fn category_create_and_update() {
        let (web, catalog) = web();
        let created = web.handle(&Request::post("/category/create").with_form("name", "Toys"));
        assert_eq!(created.header("location"), Some("/category/view/4"));

        let blank = web.handle(&Request::post("/category/update/4").with_form("name", " "));
        assert!(blank.body.contains("Name cannot be blank."));

        web.handle(&Request::post("/category/update/4").with_form("name", "Games"));
        assert_eq!(catalog.category(4).unwrap().unwrap().name, "Games");
    }

    // ── integrity enforced by the store ──────────────────────────────────

    fn garden() -> Category {
        Category {
            id: 3,
            name: "Garden".into(),
        }
    }

    #[test]
    fn category_delete_conflict_comes_from_the_store() {
        let mut repo = MockRepo::new();
        repo.expect_category().returning(|_| Ok(Some(garden())));
        repo.expect_delete_category()
            .withf(|id| *id == 3)
            .times(1)
            .returning(|_| Ok(CategoryDeletion::InUse { products: 1 }));

        let web = web_with(Arc::new(repo));
        let response = web.handle(
            &Request::post("/category/delete/3").with_header("Accept", "application/json"),
        );
        assert_eq!(response.status, 409);
        assert!(json_error(&response.body).message.contains("\"Garden\" still has 1 product(s)"));
    }

    #[test]
    fn category_removed_concurrently_is_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_category().returning(|_| Ok(Some(garden())));
        repo.expect_delete_category()
            .returning(|_| Ok(CategoryDeletion::Missing));

        let web = web_with(Arc::new(repo));
        assert_eq!(web.handle(&Request::post("/category/delete/3")).status, 404);
    }

    #[test]
    fn product_create_rerenders_when_store_rejects_category() {
        let mut repo = MockRepo::new();
        repo.expect_categories().returning(|| Ok(vec![garden()]));
        repo.expect_insert_product()
            .withf(|draft| draft.category_id == 3)
            .times(1)
            .returning(|_| Ok(ProductWrite::UnknownCategory));

        let web = web_with(Arc::new(repo));
        let response = web.handle(
            &Request::post("/product/create")
                .with_form("name", "Rake")
                .with_form("price", "12.00")
                .with_form("category_id", "3"),
        );
        assert_eq!(response.status, 200);
        assert!(response.body.contains("Category does not exist."));
    }

    // ── storage failures ─────────────────────────────────────────────────

    #[test]
    fn storage_failure_is_a_500_fault() {
        let mut repo = MockRepo::new();
        repo.expect_product()
            .returning(|_| Err(ApplicationError::StoreLockError.into()));

        let web = web_with(Arc::new(repo));
        let response = web.handle(
            &Request::get("/product/view/1").with_header("Accept", "application/json"),
        );
        assert_eq!(response.status, 500);
        let error = json_error(&response.body);
        assert_eq!(error.name, "Error 500");
        assert!(error.message.contains("Catalog store error"));
    }

    // ── console ──────────────────────────────────────────────────────────

    #[test]
    fn hello_prints_default_or_argument() {
        let console = console();
        assert_eq!(console.run(&["hello".to_string()]).stdout, "hello world\n");
        let outcome = console.run(&["hello/index".to_string(), "hi".to_string()]);
        assert_eq!(outcome.exit_code, ExitCode::OK);
        assert_eq!(outcome.stdout, "hi\n");
    }

    #[test]
    fn alias_resolve_uses_console_aliases() {
        let console = console();
        let outcome = console.run(&["alias/resolve".to_string(), "@tests/unit".to_string()]);
        assert_eq!(outcome.stdout, "/srv/shop/tests/unit\n");

        let unknown = console.run(&["alias/resolve".to_string(), "@nope".to_string()]);
        assert_eq!(unknown.exit_code, ExitCode::UNSPECIFIED_ERROR);
        assert!(unknown.stderr.contains("Invalid path alias: @nope"));

        let missing = console.run(&["alias/resolve".to_string()]);
        assert_eq!(missing.exit_code, ExitCode::USAGE);
    }

    #[test]
    fn alias_index_lists_everything() {
        let outcome = console().run(&["alias".to_string()]);
        assert!(outcome.stdout.contains("@runtime"));
        assert!(outcome.stdout.contains("@tests"));
        assert!(!outcome.stdout.contains("@webroot"));
    }
}
