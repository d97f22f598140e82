use super::entities::AttendanceRecord;
use crate::models::events::entities::Event;
use serde::Serialize;
use ts_rs::TS;

// 活动签到列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/attendance.ts")]
pub struct EventAttendanceResponse {
    pub event: Event,
    pub records: Vec<AttendanceRecord>,
    pub total: i64,
}

// 扫码页面使用的会话状态
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/attendance.ts")]
pub struct AttendanceSessionStatusResponse {
    pub event_id: i64,
    pub event_title: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_open: bool,
}
