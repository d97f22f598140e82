pub mod create_session;
pub mod deactivate;
pub mod list;
pub mod mark;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::attendance::requests::{CreateAttendanceSessionRequest, MarkAttendanceRequest};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 创建签到会话
    pub async fn create_session(
        &self,
        request: &HttpRequest,
        body: CreateAttendanceSessionRequest,
    ) -> ActixResult<HttpResponse> {
        create_session::handle_create_session(self, request, body).await
    }

    // 停用签到会话
    pub async fn deactivate_session(
        &self,
        request: &HttpRequest,
        session_id: i64,
    ) -> ActixResult<HttpResponse> {
        deactivate::handle_deactivate_session(self, request, session_id).await
    }

    // 活动签到列表
    pub async fn list_event_attendance(
        &self,
        request: &HttpRequest,
        event_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_event_attendance(self, request, event_id).await
    }

    // 扫码页面查询会话状态
    pub async fn session_status(
        &self,
        request: &HttpRequest,
        code: &str,
    ) -> ActixResult<HttpResponse> {
        status::handle_session_status(self, request, code).await
    }

    // 扫码签到
    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        body: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        mark::handle_mark_attendance(self, request, body).await
    }
}

/// 签到码统一为去空白的大写形式
pub(crate) fn normalize_session_code(code: &str) -> String {
    code.trim().to_uppercase()
}
