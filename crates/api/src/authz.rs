use axum::http::StatusCode;

use depot_auth::{authorize, Permission, Principal};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Check a permission for the request's principal; a denial becomes a 403
/// response ready to return from the handler.
pub fn require(
    principal: &PrincipalContext,
    permission: &'static str,
) -> Result<(), axum::response::Response> {
    let resolved = Principal {
        principal_id: principal.principal_id(),
        name: principal.name().to_string(),
        roles: principal.roles().to_vec(),
    };

    authorize(&resolved, &Permission::new(permission))
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
