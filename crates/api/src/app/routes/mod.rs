use axum::{routing::get, Router};

pub mod auth;
pub mod backup;
pub mod dashboard;
pub mod manufacturers;
pub mod movements;
pub mod products;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/backup", get(backup::get_backup))
        .nest("/manufacturers", manufacturers::router())
        .nest("/products", products::router())
        .nest("/movements", movements::router())
}
