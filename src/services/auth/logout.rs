use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::middlewares::{RequireSession, require_session::session_cache_key};
use crate::models::ApiResponse;
use crate::services::{cache_from_request, internal_error};

use super::AuthService;

/// 删除当前会话并清除缓存
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let cache = cache_from_request(request)?;

    let Some(token) = RequireSession::extract_token(request) else {
        return Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Logged out")));
    };

    cache.remove(&session_cache_key(&token)).await;

    match storage.delete_session(&token).await {
        Ok(_) => {
            if let Some(user_id) = RequireSession::extract_user_id(request) {
                info!("User {} logged out", user_id);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Logged out")))
        }
        Err(e) => Ok(internal_error("Failed to delete session", e)),
    }
}
