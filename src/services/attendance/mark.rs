use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{AttendanceService, normalize_session_code};
use crate::errors::SchoolHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::{Participant, SessionUnavailable},
        requests::MarkAttendanceRequest,
    },
};
use crate::services::{bad_request, internal_error, not_found};
use crate::utils::validate::validate_optional_email;

const ALREADY_MARKED: &str = "Attendance already recorded for this participant";

/// 扫码签到，不需要登录
pub async fn handle_mark_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    body: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 输入校验
    let code = normalize_session_code(&body.session_code);
    if code.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "Session code is required"));
    }
    if body.name.trim().is_empty() {
        return Ok(bad_request(
            ErrorCode::AttendanceParticipantInvalid,
            "Name is required",
        ));
    }
    if let Err(msg) = validate_optional_email(body.email.as_deref()) {
        return Ok(bad_request(ErrorCode::AttendanceParticipantInvalid, msg));
    }

    // 2. 会话状态
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

    match session.availability(Utc::now()) {
        Ok(()) => {}
        Err(SessionUnavailable::Inactive) => {
            return Ok(bad_request(
                ErrorCode::AttendanceSessionInactive,
                "Attendance session is no longer active",
            ));
        }
        Err(SessionUnavailable::Expired) => {
            return Ok(bad_request(
                ErrorCode::AttendanceSessionExpired,
                "Attendance session has expired",
            ));
        }
    }

    // 3. 学生必须属于活动所在学校且未归档；只填邮箱时按邮箱识别本校学生，
    //    同一学生无论用哪种方式签到都落在同一个去重键上
    let mut email = body.email.clone();
    let student_id = match body.student_id {
        Some(student_id) => match storage.get_student_by_id(student_id).await {
            Ok(Some(student))
                if !student.is_archived && student.school_id == session.school_id =>
            {
                email = email.or(student.email);
                Some(student.id)
            }
            Ok(_) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => return Ok(internal_error("Failed to load student", e)),
        },
        None => match body.email.as_deref() {
            Some(addr) if !addr.trim().is_empty() => {
                match storage.find_student_by_email(addr).await {
                    Ok(student) => student
                        .filter(|s| s.school_id == session.school_id)
                        .map(|s| s.id),
                    Err(e) => return Ok(internal_error("Failed to look up student", e)),
                }
            }
            _ => None,
        },
    };

    // 4. 去重后写入
    let participant = Participant::new(&body.name, email.as_deref(), student_id);
    match storage
        .find_attendance_record(session.event_id, &participant)
        .await
    {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AttendanceAlreadyMarked,
                ALREADY_MARKED,
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check attendance", e)),
    }

    match storage.create_attendance_record(&session, &participant).await {
        Ok(record) => {
            info!(
                "Attendance recorded for event {} (session {})",
                record.event_id, record.session_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(record, "Attendance recorded")))
        }
        Err(SchoolHubError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AttendanceAlreadyMarked, ALREADY_MARKED),
        )),
        Err(e) => Ok(internal_error("Failed to record attendance", e)),
    }
}
