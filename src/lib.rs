pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Mutex;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::storage::Storage;
pub use application::storefront::Storefront;
pub use config::Settings;
pub use db::{create_pool, DbPool};

use domain::errors::StoreError;
use handlers::{basket, catalog, orders, ApiDoc};
use infrastructure::kv_repo::DieselKeyValueStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), StoreError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Backend(format!("migrations failed: {}", e)))?;
    Ok(())
}

/// Postgres-backed storage when `DATABASE_URL` is set and reachable,
/// process memory otherwise.
pub fn open_storage(settings: &Settings) -> Storage {
    let Some(url) = settings.database_url.as_deref() else {
        log::warn!("DATABASE_URL not set; state will not survive a restart");
        return Storage::in_memory();
    };

    let pool = match create_pool(url, settings.db_connect_timeout) {
        Ok(pool) => pool,
        Err(e) => {
            log::warn!("Database unreachable ({}); state will not survive a restart", e);
            return Storage::in_memory();
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::warn!("{}; state will not survive a restart", e);
        return Storage::in_memory();
    }

    log::info!("Persisting state to Postgres");
    Storage::new(DieselKeyValueStore::new(pool))
}

/// Route table, shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(catalog::list_categories))
            .route("", web::post().to(catalog::create_category))
            .route("/{id}", web::patch().to(catalog::update_category))
            .route("/{id}", web::delete().to(catalog::delete_category)),
    )
    .service(
        web::scope("/articles")
            .route("", web::get().to(catalog::list_articles))
            .route("", web::post().to(catalog::create_article))
            .route("/{id}", web::get().to(catalog::get_article))
            .route("/{id}", web::patch().to(catalog::update_article))
            .route("/{id}", web::delete().to(catalog::delete_article)),
    )
    .service(
        web::scope("/basket")
            .route("", web::get().to(basket::get_basket))
            .route("", web::delete().to(basket::clear_basket))
            .route("/items", web::post().to(basket::add_item))
            .route("/items", web::delete().to(basket::delete_item))
            .route("/items/increment", web::post().to(basket::increment_item))
            .route("/items/decrement", web::post().to(basket::decrement_item))
            .route("/user", web::put().to(basket::switch_user)),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(orders::list_orders))
            .route("", web::post().to(orders::checkout)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    storefront: Storefront,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(Mutex::new(storefront));
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
