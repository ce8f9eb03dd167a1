use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use depot_reports::{movements_to_csv, movements_to_html};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .route("/export", get(export_movements))
}

pub async fn create_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreateMovementRequest>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "movements.write") {
        return resp;
    }

    match services
        .ledger()
        .apply_movement(
            body.product_id,
            body.kind,
            body.quantity,
            body.notes,
            body.occurred_at,
        )
        .await
    {
        Ok(movement) => {
            (StatusCode::CREATED, Json(dto::movement_to_json(&movement))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Query(query): Query<dto::MovementListQuery>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "movements.read") {
        return resp;
    }

    match services.store().list_movements(&query.to_filter()).await {
        Ok(rows) => Json(
            rows.iter()
                .map(dto::movement_row_to_json)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn export_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Query(query): Query<dto::MovementListQuery>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "reports.read") {
        return resp;
    }

    let Some(format) = query.format else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_format",
            "format must be csv or html",
        );
    };

    let rows = match services.store().list_movements(&query.to_filter()).await {
        Ok(rows) => rows,
        Err(e) => return errors::store_error_to_response(e),
    };

    match format {
        dto::ExportFormat::Csv => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"movements.csv\"",
                ),
            ],
            movements_to_csv(&rows),
        )
            .into_response(),
        dto::ExportFormat::Html => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            movements_to_html(&rows, Utc::now()),
        )
            .into_response(),
    }
}
