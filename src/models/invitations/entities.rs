use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::roles::entities::Role;

// 学校邀请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/invitation.ts")]
pub struct Invitation {
    pub id: i64,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub token: String,
    pub email: String,
    pub role: Role,
    pub school_id: i64,
    pub invited_by: Option<i64>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 邀请不可用的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationRejection {
    AlreadyUsed,
    Expired,
}

impl Invitation {
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), InvitationRejection> {
        if self.used_at.is_some() {
            return Err(InvitationRejection::AlreadyUsed);
        }
        if self.expires_at <= now {
            return Err(InvitationRejection::Expired);
        }
        Ok(())
    }
}

// 新邀请（存储层使用）
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub token: String,
    pub email: String,
    pub role: Role,
    pub school_id: i64,
    pub invited_by: i64,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(used: bool, expires_in: Duration) -> Invitation {
        let now = Utc::now();
        Invitation {
            id: 1,
            token: "t".to_string(),
            email: "new@school.test".to_string(),
            role: Role::Teacher,
            school_id: 1,
            invited_by: None,
            expires_at: now + expires_in,
            used_at: used.then_some(now),
            created_at: now,
        }
    }

    #[test]
    fn test_invitation_states() {
        let now = Utc::now();
        assert_eq!(invitation(false, Duration::days(1)).check(now), Ok(()));
        assert_eq!(
            invitation(true, Duration::days(1)).check(now),
            Err(InvitationRejection::AlreadyUsed)
        );
        assert_eq!(
            invitation(false, Duration::days(-1)).check(now),
            Err(InvitationRejection::Expired)
        );
    }

    #[test]
    fn test_token_not_serialized() {
        let json = serde_json::to_value(invitation(false, Duration::days(1))).unwrap();
        assert!(json.get("token").is_none());
        assert_eq!(json["role"], "teacher");
    }
}
