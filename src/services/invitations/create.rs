use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::InvitationService;
use crate::models::{
    ApiResponse, ErrorCode,
    invitations::{
        entities::NewInvitation, requests::CreateInvitationRequest,
        responses::CreatedInvitationResponse,
    },
    roles::entities::Role,
};
use crate::services::{bad_request, current_user, forbidden, internal_error, not_found};
use crate::utils::validate::validate_email;

pub async fn handle_create_invitation(
    service: &InvitationService,
    request: &HttpRequest,
    body: CreateInvitationRequest,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let email = body.email.trim().to_lowercase();
    if let Err(msg) = validate_email(&email) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    // 全局管理员不能通过邀请产生
    if body.role == Role::GlobalAdmin {
        return Ok(bad_request(
            ErrorCode::InvitationInvalid,
            "Global administrators cannot be invited",
        ));
    }

    match storage.get_school_by_id(body.school_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => return Ok(internal_error("Failed to load school", e)),
    }

    if !session_user.can_manage_school(body.school_id) {
        return Ok(forbidden("Only school administrators can send invitations"));
    }

    let token = Uuid::new_v4().simple().to_string();
    let expires_at = Utc::now() + service.get_config().invitation_ttl();

    let invitation = match storage
        .create_invitation(NewInvitation {
            token: token.clone(),
            email,
            role: body.role,
            school_id: body.school_id,
            invited_by: session_user.user.id,
            expires_at,
        })
        .await
    {
        Ok(invitation) => invitation,
        Err(e) => return Ok(internal_error("Failed to create invitation", e)),
    };

    info!(
        "Invitation {} created for school {} as {}",
        invitation.id, invitation.school_id, invitation.role
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreatedInvitationResponse {
            id: invitation.id,
            token,
            email: invitation.email,
            role: invitation.role,
            school_id: invitation.school_id,
            expires_at: invitation.expires_at,
        },
        "Invitation created",
    )))
}
