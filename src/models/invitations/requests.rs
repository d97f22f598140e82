use serde::Deserialize;
use ts_rs::TS;

use crate::models::roles::entities::Role;

// 创建邀请
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/invitation.ts")]
pub struct CreateInvitationRequest {
    pub email: String,
    pub role: Role,
    #[serde(alias = "schoolId")]
    pub school_id: i64,
}

// 校验邀请令牌
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/invitation.ts")]
pub struct ValidateInvitationRequest {
    #[serde(default)]
    pub token: String,
}

// 接受邀请并创建账号
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/invitation.ts")]
pub struct AcceptInvitationRequest {
    #[serde(default)]
    pub token: String,
    #[serde(alias = "fullName")]
    pub full_name: String,
    pub password: String,
}
