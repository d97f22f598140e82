use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{info, warn};

use super::AttendanceService;
use crate::errors::SchoolHubError;
use crate::models::{
    ApiResponse, ErrorCode, attendance::requests::CreateAttendanceSessionRequest,
};
use crate::services::{bad_request, current_user, forbidden, internal_error, not_found};
use crate::utils::random_code::generate_session_code;

/// 签到码冲突时的最大生成次数
const MAX_CODE_ATTEMPTS: usize = 5;

pub async fn handle_create_session(
    service: &AttendanceService,
    request: &HttpRequest,
    body: CreateAttendanceSessionRequest,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    let event = match storage.get_event_by_id(body.event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => return Ok(internal_error("Failed to load event", e)),
    };

    if !session_user.can_manage_school(event.school_id) {
        return Ok(forbidden(
            "Only school administrators can open attendance sessions",
        ));
    }

    let Some(duration) = config.attendance_duration(body.duration_minutes) else {
        return Ok(bad_request(
            ErrorCode::AttendanceDurationInvalid,
            format!(
                "Duration must be between 1 and {} minutes",
                config.attendance.max_duration_minutes
            ),
        ));
    };
    let expires_at = Utc::now() + duration;

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = generate_session_code(config.attendance.code_length);
        match storage
            .create_attendance_session(&event, &code, expires_at, session_user.user.id)
            .await
        {
            Ok(session) => {
                info!(
                    "Attendance session {} opened for event {} by user {}",
                    session.id, event.id, session_user.user.id
                );
                return Ok(HttpResponse::Created().json(ApiResponse::success(
                    session,
                    "Attendance session created",
                )));
            }
            Err(SchoolHubError::Conflict(_)) => {
                warn!("Session code collision on attempt {}", attempt);
            }
            Err(e) => return Ok(internal_error("Failed to create attendance session", e)),
        }
    }

    Ok(internal_error(
        "Failed to create attendance session",
        "could not generate a unique session code",
    ))
}
