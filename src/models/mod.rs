//! 数据模型定义
//!
//! 业务实体、请求与响应结构，以及统一的错误代码。

pub mod attendance;
pub mod auth;
pub mod common;
pub mod events;
pub mod invitations;
pub mod roles;
pub mod schools;
pub mod students;
pub mod users;

pub use common::{ApiResponse, PaginationInfo};

/// 业务错误代码
///
/// 0 表示成功；1xxx 通用错误；2xxx 认证；3xxx 学校与学生；
/// 4xxx 签到；5xxx 邀请。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    NotFound = 1001,
    InternalServerError = 1002,
    RateLimitExceeded = 1003,

    Unauthorized = 2000,
    Forbidden = 2001,
    AuthFailed = 2002,
    AccountInactive = 2003,
    SessionExpired = 2004,

    SchoolNotFound = 3000,
    StudentNotFound = 3001,
    StudentEmailInvalid = 3002,

    EventNotFound = 4000,
    AttendanceSessionNotFound = 4001,
    AttendanceSessionInactive = 4002,
    AttendanceSessionExpired = 4003,
    AttendanceAlreadyMarked = 4004,
    AttendanceParticipantInvalid = 4005,
    AttendanceDurationInvalid = 4006,

    InvitationNotFound = 5000,
    InvitationUsed = 5001,
    InvitationExpired = 5002,
    InvitationInvalid = 5003,
    UserEmailAlreadyExists = 5004,
    UserPasswordInvalid = 5005,
}
