use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::{AttendanceService, normalize_session_code};
use crate::models::{
    ApiResponse, ErrorCode, attendance::responses::AttendanceSessionStatusResponse,
};
use crate::services::{internal_error, not_found};

/// 扫码页面展示用，不需要登录
pub async fn handle_session_status(
    service: &AttendanceService,
    request: &HttpRequest,
    code: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let code = normalize_session_code(code);

    let session = match storage.get_attendance_session_by_code(&code).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AttendanceSessionNotFound,
                "Attendance session not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to load attendance session", e)),
    };

    let event = match storage.get_event_by_id(session.event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => return Ok(internal_error("Failed to load event", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSessionStatusResponse {
            event_id: event.id,
            event_title: event.title,
            expires_at: session.expires_at,
            is_open: session.is_open(Utc::now()),
        },
        "Attendance session found",
    )))
}
