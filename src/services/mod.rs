pub mod attendance;
pub mod auth;
pub mod invitations;
pub mod schools;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, error::ErrorInternalServerError, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::middlewares::RequireSession;
use crate::models::auth::SessionUser;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use invitations::InvitationService;
pub use schools::SchoolService;
pub use students::StudentService;

/// 从应用数据中取存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> actix_web::Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| ErrorInternalServerError("Storage not found in app data"))
}

/// 从应用数据中取缓存实例
pub(crate) fn cache_from_request(request: &HttpRequest) -> actix_web::Result<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| ErrorInternalServerError("Cache not found in app data"))
}

/// 当前会话用户，缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<SessionUser, HttpResponse> {
    RequireSession::extract_session_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        ))
    })
}

/// 记录错误详情，对外只返回通用信息
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        "Internal server error",
    ))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}
