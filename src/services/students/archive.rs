use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, internal_error, not_found};

pub async fn handle_archive_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to load student", e)),
    };

    if !session_user.can_manage_school(student.school_id) {
        return Ok(forbidden("Only school administrators can archive students"));
    }

    match storage.archive_student(student_id).await {
        Ok(_) => {
            info!(
                "Student {} archived by user {}",
                student_id, session_user.user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student archived")))
        }
        Err(e) => Ok(internal_error("Failed to archive student", e)),
    }
}
