pub mod archive;
pub mod find_by_email;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{FindStudentByEmailRequest, StudentQueryParams};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 按邮箱查找学生
    pub async fn find_by_email(
        &self,
        request: &HttpRequest,
        body: FindStudentByEmailRequest,
    ) -> ActixResult<HttpResponse> {
        find_by_email::handle_find_by_email(self, request, body).await
    }

    // 学校学生列表
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        school_id: i64,
        query: StudentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_students(self, request, school_id, query).await
    }

    // 归档学生
    pub async fn archive_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        archive::handle_archive_student(self, request, student_id).await
    }
}
