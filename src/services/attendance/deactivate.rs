use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, internal_error, not_found};

pub async fn handle_deactivate_session(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let session = match storage.get_attendance_session_by_id(session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AttendanceSessionNotFound,
                "Attendance session not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to load attendance session", e)),
    };

    if !session_user.can_manage_school(session.school_id) {
        return Ok(forbidden(
            "Only school administrators can close attendance sessions",
        ));
    }

    match storage.deactivate_attendance_session(session_id).await {
        Ok(_) => {
            info!("Attendance session {} deactivated", session_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Attendance session deactivated",
            )))
        }
        Err(e) => Ok(internal_error("Failed to deactivate attendance session", e)),
    }
}
