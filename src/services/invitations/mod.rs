pub mod accept;
pub mod create;
pub mod validate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::invitations::{
    entities::{Invitation, InvitationRejection},
    requests::{AcceptInvitationRequest, CreateInvitationRequest, ValidateInvitationRequest},
};
use crate::services::{bad_request, internal_error, not_found};
use crate::storage::Storage;

pub struct InvitationService {
    storage: Option<Arc<dyn Storage>>,
}

impl InvitationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 创建邀请
    pub async fn create_invitation(
        &self,
        request: &HttpRequest,
        body: CreateInvitationRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_invitation(self, request, body).await
    }

    // 校验邀请令牌
    pub async fn validate_invitation(
        &self,
        request: &HttpRequest,
        body: ValidateInvitationRequest,
    ) -> ActixResult<HttpResponse> {
        validate::handle_validate_invitation(self, request, body).await
    }

    // 接受邀请
    pub async fn accept_invitation(
        &self,
        request: &HttpRequest,
        body: AcceptInvitationRequest,
    ) -> ActixResult<HttpResponse> {
        accept::handle_accept_invitation(self, request, body).await
    }
}

/// 按令牌取出仍可使用的邀请，否则返回对应的错误响应
pub(crate) async fn load_usable_invitation(
    storage: &Arc<dyn Storage>,
    token: &str,
) -> Result<Invitation, HttpResponse> {
    let token = token.trim();
    if token.is_empty() {
        return Err(bad_request(
            ErrorCode::InvitationInvalid,
            "Invitation token is required",
        ));
    }

    let invitation = match storage.get_invitation_by_token(token).await {
        Ok(Some(invitation)) => invitation,
        Ok(None) => {
            return Err(not_found(
                ErrorCode::InvitationNotFound,
                "Invitation not found",
            ));
        }
        Err(e) => return Err(internal_error("Failed to load invitation", e)),
    };

    match invitation.check(Utc::now()) {
        Ok(()) => Ok(invitation),
        Err(InvitationRejection::AlreadyUsed) => Err(bad_request(
            ErrorCode::InvitationUsed,
            "Invitation has already been used",
        )),
        Err(InvitationRejection::Expired) => Err(bad_request(
            ErrorCode::InvitationExpired,
            "Invitation has expired",
        )),
    }
}
