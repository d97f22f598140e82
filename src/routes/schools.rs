use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::routes::students::configure_school_student_routes;
use crate::services::SchoolService;

// 懒加载的全局 SchoolService 实例
static SCHOOL_SERVICE: Lazy<SchoolService> = Lazy::new(SchoolService::new_lazy);

pub async fn list_schools(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.list_schools(&req).await
}

// 配置路由
pub fn configure_school_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schools")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_schools))
            .configure(configure_school_student_routes),
    );
}
