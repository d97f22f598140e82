use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, roles::entities::scoped_school_ids};
use crate::services::{current_user, internal_error};

/// 全局管理员看到全部学校，其他账号只看到角色所在的学校
pub async fn handle_list_schools(
    service: &SchoolService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let scope = if session_user.is_global_admin() {
        None
    } else {
        Some(scoped_school_ids(&session_user.roles))
    };

    match storage.list_schools(scope).await {
        Ok(schools) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            schools,
            "Schools retrieved",
        ))),
        Err(e) => Ok(internal_error("Failed to list schools", e)),
    }
}
