use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::errors;
use crate::app::services::AppServices;

/// Full JSON snapshot of the database, for download.
pub async fn get_backup(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, "backup.read") {
        return resp;
    }

    match services.store().snapshot().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
