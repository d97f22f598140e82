use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode, students::requests::FindStudentByEmailRequest};
use crate::services::{bad_request, current_user, forbidden, internal_error, not_found};
use crate::utils::validate::validate_email;

pub async fn handle_find_by_email(
    service: &StudentService,
    request: &HttpRequest,
    body: FindStudentByEmailRequest,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let email = body.email.trim();
    if let Err(msg) = validate_email(email) {
        return Ok(bad_request(ErrorCode::StudentEmailInvalid, msg));
    }

    let student = match storage.find_student_by_email(email).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to look up student", e)),
    };

    if !session_user.can_view_school(student.school_id) {
        return Ok(forbidden("You do not have access to this school"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(student, "Student found")))
}
