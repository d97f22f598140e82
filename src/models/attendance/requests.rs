use serde::Deserialize;
use ts_rs::TS;

// 创建签到会话请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/attendance.ts")]
pub struct CreateAttendanceSessionRequest {
    #[serde(alias = "eventId")]
    pub event_id: i64,
    /// 有效时长（分钟），缺省使用配置值
    #[serde(alias = "durationMinutes")]
    pub duration_minutes: Option<i64>,
}

// 扫码签到请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    #[serde(alias = "sessionCode", default)]
    pub session_code: String,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    #[serde(alias = "studentId")]
    pub student_id: Option<i64>,
}
