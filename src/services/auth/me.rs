use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, auth::SessionInfoResponse};
use crate::services::current_user;

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SessionInfoResponse {
            user: session_user.user,
            roles: session_user.roles,
            session_expires_at: session_user.session_expires_at,
        },
        "Session is valid",
    )))
}
