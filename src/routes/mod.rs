pub mod health;
pub mod properties;
pub mod property_types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Property types
        .route(
            "/property-types",
            get(property_types::list).post(property_types::save),
        )
        .route("/property-types/new", get(property_types::form))
        .route(
            "/property-types/:id",
            get(property_types::detail).delete(property_types::soft_delete),
        )
        .route("/property-types/:id/edit", get(property_types::edit_form))
        .route(
            "/property-types/:id/delete",
            post(property_types::soft_delete),
        )
        // Properties
        .route("/properties", get(properties::list).post(properties::save))
        .route("/properties/new", get(properties::form))
        .route(
            "/properties/:id",
            get(properties::detail).delete(properties::delete),
        )
        .route("/properties/:id/edit", get(properties::edit_form))
        .route("/properties/:id/delete", post(properties::delete))
}
