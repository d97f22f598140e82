use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{ApiResponse, ErrorCode, attendance::responses::EventAttendanceResponse};
use crate::services::{current_user, forbidden, internal_error, not_found};

pub async fn handle_list_event_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let event = match storage.get_event_by_id(event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => return Ok(internal_error("Failed to load event", e)),
    };

    if !session_user.can_view_school(event.school_id) {
        return Ok(forbidden("You do not have access to this school"));
    }

    match storage.list_event_attendance(event_id).await {
        Ok(records) => {
            let total = records.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                EventAttendanceResponse {
                    event,
                    records,
                    total,
                },
                "Attendance retrieved",
            )))
        }
        Err(e) => Ok(internal_error("Failed to list attendance", e)),
    }
}
