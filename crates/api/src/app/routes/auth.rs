use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use depot_auth::SessionClaims;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services
        .identity()
        .authenticate(&body.username, &body.password)
    {
        Ok(user) => user,
        Err(e) => {
            tracing::info!(username = %body.username, "login rejected");
            return errors::json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", e.to_string());
        }
    };

    let now = Utc::now();
    let claims = SessionClaims {
        sub: user.principal_id,
        name: user.display_name.clone(),
        roles: user.roles.clone(),
        issued_at: now,
        expires_at: now + services.session_ttl(),
    };

    let token = match services.session_codec().issue(&claims) {
        Ok(token) => token,
        Err(e) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", e.to_string())
        }
    };

    tracing::info!(username = %user.username, "login succeeded");

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "name": user.display_name,
            "roles": user.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
            "expires_at": claims.expires_at.to_rfc3339(),
        })),
    )
        .into_response()
}
