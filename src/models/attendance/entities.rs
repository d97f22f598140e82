//! 扫码签到实体
//!
//! 签到会话由活动管理者创建，持有一个短的字母数字签到码和过期时间；
//! 扫码端提交签到码与参与者信息，生成一条签到记录。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 签到会话
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/attendance.ts")]
pub struct AttendanceSession {
    pub id: i64,
    pub event_id: i64,
    pub school_id: i64,
    pub session_code: String,
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// 签到会话不可用的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUnavailable {
    Inactive,
    Expired,
}

impl AttendanceSession {
    /// 检查会话此刻是否接受签到
    pub fn availability(&self, now: DateTime<Utc>) -> Result<(), SessionUnavailable> {
        if !self.is_active {
            return Err(SessionUnavailable::Inactive);
        }
        if self.expires_at <= now {
            return Err(SessionUnavailable::Expired);
        }
        Ok(())
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.availability(now).is_ok()
    }
}

// 签到记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub event_id: i64,
    pub session_id: i64,
    pub participant_name: String,
    pub participant_email: Option<String>,
    pub student_id: Option<i64>,
    pub checked_in_at: DateTime<Utc>,
}

/// 签到参与者
///
/// 去重键优先使用学生 ID，其次邮箱，最后姓名（均不区分大小写）。
/// 键只看本次提交的字段，调用方应先把能识别的学生解析成 `student_id`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub email: Option<String>,
    pub student_id: Option<i64>,
}

impl Participant {
    pub fn new(name: &str, email: Option<&str>, student_id: Option<i64>) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_lowercase),
            student_id,
        }
    }

    pub fn key(&self) -> String {
        if let Some(id) = self.student_id {
            format!("student:{id}")
        } else if let Some(email) = &self.email {
            format!("email:{email}")
        } else {
            format!("name:{}", self.name.to_lowercase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(active: bool, expires_in: Duration) -> AttendanceSession {
        let now = Utc::now();
        AttendanceSession {
            id: 1,
            event_id: 1,
            school_id: 1,
            session_code: "ABCD1234".to_string(),
            is_active: active,
            expires_at: now + expires_in,
            created_by: 1,
            created_at: now,
        }
    }

    #[test]
    fn test_open_session() {
        assert_eq!(session(true, Duration::minutes(5)).availability(Utc::now()), Ok(()));
    }

    #[test]
    fn test_inactive_session() {
        assert_eq!(
            session(false, Duration::minutes(5)).availability(Utc::now()),
            Err(SessionUnavailable::Inactive)
        );
    }

    #[test]
    fn test_expired_session() {
        let s = session(true, Duration::minutes(-1));
        assert_eq!(s.availability(Utc::now()), Err(SessionUnavailable::Expired));
        assert!(!s.is_open(Utc::now()));
    }

    #[test]
    fn test_participant_key_prefers_student() {
        let p = Participant::new("Ana", Some("ana@school.test"), Some(12));
        assert_eq!(p.key(), "student:12");
    }

    #[test]
    fn test_participant_key_normalizes_email() {
        let p = Participant::new(" Ana ", Some(" Ana@School.Test "), None);
        assert_eq!(p.key(), "email:ana@school.test");
        assert_eq!(p.name, "Ana");
    }

    #[test]
    fn test_participant_key_falls_back_to_name() {
        let p = Participant::new("Ana Lima", Some("  "), None);
        assert_eq!(p.email, None);
        assert_eq!(p.key(), "name:ana lima");
    }
}
