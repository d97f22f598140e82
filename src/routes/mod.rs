pub mod attendance;

pub mod auth;

pub mod invitations;

pub mod schools;

pub mod students;


pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use invitations::configure_invitation_routes;
pub use schools::configure_school_routes;
pub use students::configure_student_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_attendance_routes)
        .configure(configure_invitation_routes)
        .configure(configure_school_routes)
        .configure(configure_student_routes);
}
