use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::attendance::requests::{CreateAttendanceSessionRequest, MarkAttendanceRequest};
use crate::services::AttendanceService;
use crate::utils::{SafeEventIdI64, SafeSessionIdI64};

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

// 开启签到会话
pub async fn create_session(
    req: HttpRequest,
    body: web::Json<CreateAttendanceSessionRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_session(&req, body.into_inner())
        .await
}

// 关闭签到会话
pub async fn deactivate_session(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .deactivate_session(&req, session_id.0)
        .await
}

// 活动签到列表
pub async fn list_event_attendance(
    req: HttpRequest,
    event_id: SafeEventIdI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_event_attendance(&req, event_id.0)
        .await
}

// 扫码页面查询会话
pub async fn session_status(
    req: HttpRequest,
    code: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.session_status(&req, &code).await
}

// 扫码签到
pub async fn mark_attendance(
    req: HttpRequest,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(&req, body.into_inner())
        .await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            // 公开端点：扫码页面使用
            .service(
                web::resource("/mark")
                    .wrap(RateLimit::mark_attendance())
                    .route(web::post().to(mark_attendance)),
            )
            .route("/sessions/code/{code}", web::get().to(session_status))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireSession)
                    // 权限在业务层按活动所在学校检查
                    .route("/sessions", web::post().to(create_session))
                    .route(
                        "/sessions/{session_id}/deactivate",
                        web::post().to(deactivate_session),
                    )
                    .route("/events/{event_id}", web::get().to(list_event_attendance)),
            ),
    );
}
