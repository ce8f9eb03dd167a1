use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};
use chrono::Utc;

use depot_catalog::ProductFilter;
use depot_ledger::MovementFilter;

use crate::app::errors;
use crate::app::services::AppServices;

/// Derive the dashboard from the full movement history and product listing.
/// Recomputed on every read.
pub async fn get_dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "reports.read") {
        return resp;
    }

    let movements = match services
        .store()
        .list_movements(&MovementFilter::default())
        .await
    {
        Ok(rows) => rows,
        Err(e) => return errors::store_error_to_response(e),
    };

    let products = match services.store().list_products(&ProductFilter::default()).await {
        Ok(rows) => rows,
        Err(e) => return errors::store_error_to_response(e),
    };

    let dashboard = depot_reports::dashboard(
        &movements,
        &products,
        Utc::now(),
        services.low_stock_threshold(),
    );

    Json(dashboard).into_response()
}
