use crate::models::roles::entities::RoleAssignment;
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 登录响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: User,
    pub roles: Vec<RoleAssignment>,
}

// 当前会话信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/auth.ts")]
pub struct SessionInfoResponse {
    pub user: User,
    pub roles: Vec<RoleAssignment>,
    pub session_expires_at: chrono::DateTime<chrono::Utc>,
}
