//! REST document store behind the storefront admin: `products` and `upi`
//! collections persisted as JSON files.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;
pub mod store;

use axum::{middleware, routing::get, Router};
use storefront_core::{Product, UpiConfig};
use tower_http::cors::CorsLayer;

pub use config::ServerConfig;
pub use error::AppError;
pub use state::{AppState, HasCollection};
pub use store::{Collection, StoreError};

use logging::api_logging_middleware;
use routes::{
    create_document, delete_document, get_document, health_check, list_documents,
    update_document,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/products",
            get(list_documents::<Product, AppState>).post(create_document::<Product, AppState>),
        )
        .route(
            "/api/products/:id",
            get(get_document::<Product, AppState>)
                .put(update_document::<Product, AppState>)
                .delete(delete_document::<Product, AppState>),
        )
        .route(
            "/api/upi",
            get(list_documents::<UpiConfig, AppState>).post(create_document::<UpiConfig, AppState>),
        )
        .route(
            "/api/upi/:id",
            get(get_document::<UpiConfig, AppState>)
                .put(update_document::<UpiConfig, AppState>)
                .delete(delete_document::<UpiConfig, AppState>),
        )
        .layer(middleware::from_fn(api_logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
