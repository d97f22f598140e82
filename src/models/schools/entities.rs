use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学校（租户）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/school.ts")]
pub struct School {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
