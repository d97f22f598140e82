use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::roles::entities::{self as roles, RoleAssignment};
use crate::models::users::entities::User;

// 登录会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// 会话校验失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    Missing,
    Invalid,
    Expired,
    AccountInactive,
}

impl SessionRejection {
    pub fn message(&self) -> &'static str {
        match self {
            SessionRejection::Missing => "Missing session token",
            SessionRejection::Invalid => "Invalid session",
            SessionRejection::Expired => "Session expired",
            SessionRejection::AccountInactive => "Account is inactive",
        }
    }
}

/// 已通过校验的会话用户，由 RequireSession 放入请求扩展
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub user: User,
    pub roles: Vec<RoleAssignment>,
    pub session_expires_at: DateTime<Utc>,
}

impl SessionUser {
    /// 校验会话与账号状态
    pub fn check(
        session: &Session,
        user: Option<&User>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionRejection> {
        if session.is_expired(now) {
            return Err(SessionRejection::Expired);
        }
        match user {
            Some(user) if user.is_active => Ok(()),
            Some(_) => Err(SessionRejection::AccountInactive),
            None => Err(SessionRejection::Invalid),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.session_expires_at <= now
    }

    pub fn can_manage_school(&self, school_id: i64) -> bool {
        roles::can_manage_school(&self.roles, school_id)
    }

    pub fn can_view_school(&self, school_id: i64) -> bool {
        roles::can_view_school(&self.roles, school_id)
    }

    pub fn is_global_admin(&self) -> bool {
        roles::is_global_admin(&self.roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(active: bool) -> User {
        let now = Utc::now();
        User {
            id: 1,
            email: "a@school.test".to_string(),
            password_hash: String::new(),
            full_name: None,
            is_active: active,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn session(expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: 1,
            user_id: 1,
            token: "tok".to_string(),
            expires_at: now + expires_in,
            created_at: now,
        }
    }

    #[test]
    fn test_valid_session() {
        let s = session(Duration::hours(1));
        assert_eq!(SessionUser::check(&s, Some(&user(true)), Utc::now()), Ok(()));
    }

    #[test]
    fn test_expired_session_wins_over_inactive() {
        let s = session(Duration::seconds(-1));
        assert_eq!(
            SessionUser::check(&s, Some(&user(false)), Utc::now()),
            Err(SessionRejection::Expired)
        );
    }

    #[test]
    fn test_inactive_account() {
        let s = session(Duration::hours(1));
        assert_eq!(
            SessionUser::check(&s, Some(&user(false)), Utc::now()),
            Err(SessionRejection::AccountInactive)
        );
    }

    #[test]
    fn test_missing_account() {
        let s = session(Duration::hours(1));
        assert_eq!(
            SessionUser::check(&s, None, Utc::now()),
            Err(SessionRejection::Invalid)
        );
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let s = session(Duration::hours(1));
        assert!(s.is_expired(s.expires_at));
    }
}
