use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use depot_catalog::Manufacturer;
use depot_core::ManufacturerId;
use depot_store::StoreError;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_manufacturers).post(create_manufacturer))
        .route(
            "/:id",
            get(get_manufacturer)
                .put(update_manufacturer)
                .delete(delete_manufacturer),
        )
}

pub async fn list_manufacturers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "manufacturers.read") {
        return resp;
    }

    match services.store().list_manufacturers().await {
        Ok(summaries) => Json(
            summaries
                .iter()
                .map(dto::manufacturer_summary_to_json)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_manufacturer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreateManufacturerRequest>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "manufacturers.write") {
        return resp;
    }

    let manufacturer = match Manufacturer::new(ManufacturerId::new(), body.name) {
        Ok(m) => m,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().insert_manufacturer(&manufacturer).await {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": manufacturer.id.to_string(),
            "name": manufacturer.name,
        })),
    )
        .into_response()
}

pub async fn get_manufacturer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "manufacturers.read") {
        return resp;
    }

    let id: ManufacturerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid manufacturer id")
        }
    };

    match services.store().get_manufacturer(id).await {
        Ok(Some(m)) => Json(serde_json::json!({
            "id": m.id.to_string(),
            "name": m.name,
        }))
        .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "manufacturer not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_manufacturer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateManufacturerRequest>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "manufacturers.write") {
        return resp;
    }

    let id: ManufacturerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid manufacturer id")
        }
    };

    // Reuse constructor validation for the new name.
    let validated = match Manufacturer::new(id, body.name) {
        Ok(m) => m,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .store()
        .rename_manufacturer(id, &validated.name)
        .await
    {
        Ok(()) => Json(serde_json::json!({
            "id": id.to_string(),
            "name": validated.name,
        }))
        .into_response(),
        Err(StoreError::NotFound) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "manufacturer not found")
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_manufacturer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "manufacturers.delete") {
        return resp;
    }

    let id: ManufacturerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid manufacturer id")
        }
    };

    match services.store().delete_manufacturer(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(StoreError::NotFound) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "manufacturer not found")
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
