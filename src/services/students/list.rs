use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    students::requests::{StudentListQuery, StudentQueryParams},
};
use crate::services::{current_user, forbidden, internal_error, not_found};

pub async fn handle_list_students(
    service: &StudentService,
    request: &HttpRequest,
    school_id: i64,
    query: StudentQueryParams,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_school_by_id(school_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => return Ok(internal_error("Failed to load school", e)),
    }

    if !session_user.can_view_school(school_id) {
        return Ok(forbidden("You do not have access to this school"));
    }

    let list_query = StudentListQuery {
        school_id,
        page: query.page,
        size: query.size,
        class_id: query.class_id,
        search: query.search,
        include_archived: query.include_archived,
    };

    match storage.list_students_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Students retrieved",
        ))),
        Err(e) => Ok(internal_error("Failed to list students", e)),
    }
}
