use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{InvitationService, load_usable_invitation};
use crate::models::{
    ApiResponse, ErrorCode,
    invitations::{requests::ValidateInvitationRequest, responses::InvitationDetailsResponse},
};
use crate::services::{internal_error, not_found};

pub async fn handle_validate_invitation(
    service: &InvitationService,
    request: &HttpRequest,
    body: ValidateInvitationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let invitation = match load_usable_invitation(&storage, &body.token).await {
        Ok(invitation) => invitation,
        Err(response) => return Ok(response),
    };

    let school = match storage.get_school_by_id(invitation.school_id).await {
        Ok(Some(school)) => school,
        Ok(None) => return Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => return Ok(internal_error("Failed to load school", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        InvitationDetailsResponse {
            email: invitation.email,
            role: invitation.role,
            school_id: school.id,
            school_name: school.name,
            expires_at: invitation.expires_at,
        },
        "Invitation is valid",
    )))
}
