use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{InvitationService, load_usable_invitation};
use crate::errors::SchoolHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    invitations::{requests::AcceptInvitationRequest, responses::AcceptInvitationResponse},
    users::entities::NewUser,
};
use crate::services::{bad_request, internal_error};
use crate::utils::{password::hash_password, validate::validate_password};

const EMAIL_TAKEN: &str = "An account with this email already exists";

fn email_taken() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::UserEmailAlreadyExists,
        EMAIL_TAKEN,
    ))
}

pub async fn handle_accept_invitation(
    service: &InvitationService,
    request: &HttpRequest,
    body: AcceptInvitationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let invitation = match load_usable_invitation(&storage, &body.token).await {
        Ok(invitation) => invitation,
        Err(response) => return Ok(response),
    };

    let full_name = body.full_name.trim();
    if full_name.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "Full name is required"));
    }
    if let Err(msg) = validate_password(&body.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    match storage.get_user_by_email(&invitation.email).await {
        Ok(Some(_)) => return Ok(email_taken()),
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check existing account", e)),
    }

    let password_hash = match hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Failed to hash password", e)),
    };

    let new_user = NewUser {
        email: invitation.email.clone(),
        password_hash,
        full_name: Some(full_name.to_string()),
    };

    match storage.accept_invitation(&invitation, new_user).await {
        Ok((user, roles)) => {
            info!(
                "Invitation {} accepted, account {} created",
                invitation.id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AcceptInvitationResponse { user, roles },
                "Account created",
            )))
        }
        Err(SchoolHubError::Conflict(_)) => {
            // 并发接受：区分邀请已被使用和邮箱已被注册
            match load_usable_invitation(&storage, &invitation.token).await {
                Err(response) => Ok(response),
                Ok(_) => Ok(email_taken()),
            }
        }
        Err(e) => Ok(internal_error("Failed to accept invitation", e)),
    }
}
