use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::invitations::requests::{
    AcceptInvitationRequest, CreateInvitationRequest, ValidateInvitationRequest,
};
use crate::services::InvitationService;

// 懒加载的全局 InvitationService 实例
static INVITATION_SERVICE: Lazy<InvitationService> = Lazy::new(InvitationService::new_lazy);

pub async fn create_invitation(
    req: HttpRequest,
    body: web::Json<CreateInvitationRequest>,
) -> ActixResult<HttpResponse> {
    INVITATION_SERVICE
        .create_invitation(&req, body.into_inner())
        .await
}

pub async fn validate_invitation(
    req: HttpRequest,
    body: web::Json<ValidateInvitationRequest>,
) -> ActixResult<HttpResponse> {
    INVITATION_SERVICE
        .validate_invitation(&req, body.into_inner())
        .await
}

pub async fn accept_invitation(
    req: HttpRequest,
    body: web::Json<AcceptInvitationRequest>,
) -> ActixResult<HttpResponse> {
    INVITATION_SERVICE
        .accept_invitation(&req, body.into_inner())
        .await
}

// 配置路由
pub fn configure_invitation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/invitations")
            // 公开端点：受邀者尚无账号
            .service(
                web::resource("/validate")
                    .wrap(RateLimit::invitation())
                    .route(web::post().to(validate_invitation)),
            )
            .service(
                web::resource("/accept")
                    .wrap(RateLimit::invitation())
                    .route(web::post().to(accept_invitation)),
            )
            .service(
                web::resource("")
                    .wrap(middlewares::RequireSession)
                    .route(web::post().to(create_invitation)),
            ),
    );
}
