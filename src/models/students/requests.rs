use serde::Deserialize;
use ts_rs::TS;

// 按邮箱查找学生
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/student.ts")]
pub struct FindStudentByEmailRequest {
    pub email: String,
}

// 学生列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/student.ts")]
pub struct StudentQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub class_id: Option<i64>,
    #[serde(default)]
    pub include_archived: bool,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct StudentListQuery {
    pub school_id: i64,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub search: Option<String>,
    pub include_archived: bool,
}
