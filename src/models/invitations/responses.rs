use crate::models::roles::entities::{Role, RoleAssignment};
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 邀请详情（校验通过后返回）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/invitation.ts")]
pub struct InvitationDetailsResponse {
    pub email: String,
    pub role: Role,
    pub school_id: i64,
    pub school_name: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

// 创建邀请结果，令牌只在此处返回一次
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/invitation.ts")]
pub struct CreatedInvitationResponse {
    pub id: i64,
    pub token: String,
    pub email: String,
    pub role: Role,
    pub school_id: i64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/invitation.ts")]
pub struct AcceptInvitationResponse {
    pub user: User,
    pub roles: Vec<RoleAssignment>,
}
