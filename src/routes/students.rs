use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::{FindStudentByEmailRequest, StudentQueryParams};
use crate::services::StudentService;
use crate::utils::{SafeSchoolIdI64, SafeStudentIdI64};

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn find_by_email(
    req: HttpRequest,
    body: web::Json<FindStudentByEmailRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.find_by_email(&req, body.into_inner()).await
}

pub async fn list_school_students(
    req: HttpRequest,
    school_id: SafeSchoolIdI64,
    query: web::Query<StudentQueryParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .list_students(&req, school_id.0, query.into_inner())
        .await
}

pub async fn archive_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.archive_student(&req, student_id.0).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireSession)
            .route("/find-by-email", web::post().to(find_by_email))
            .route("/{student_id}/archive", web::post().to(archive_student)),
    );
}

// 学校下的学生列表挂在 /api/v1/schools 作用域中
pub fn configure_school_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{school_id}/students", web::get().to(list_school_students));
}
