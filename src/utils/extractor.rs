//! 路径参数提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400，不进入业务层。

use actix_web::{HttpRequest, HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

/// 从路由匹配信息中解析正整数 ID
pub fn parse_positive_id(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter '{param}': {raw}");
            let response =
                HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

/// 定义安全的 i64 路径参数提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                std::future::ready(
                    $crate::utils::extractor::parse_positive_id(req, $param).map($name),
                )
            }
        }
    };
}

define_safe_i64_extractor!(SafeEventIdI64, "event_id");
define_safe_i64_extractor!(SafeSessionIdI64, "session_id");
define_safe_i64_extractor!(SafeSchoolIdI64, "school_id");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{FromRequest, ResponseError, test::TestRequest};

    #[actix_web::test]
    async fn test_valid_id() {
        let (req, mut payload) = TestRequest::default()
            .param("event_id", "42")
            .to_http_parts();
        let id = SafeEventIdI64::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_rejects_non_positive_and_garbage() {
        for raw in ["0", "-7", "abc", "1e3"] {
            let (req, mut payload) = TestRequest::default()
                .param("student_id", raw)
                .to_http_parts();
            let err = SafeStudentIdI64::from_request(&req, &mut payload)
                .await
                .unwrap_err();
            assert_eq!(
                err.as_response_error().status_code(),
                actix_web::http::StatusCode::BAD_REQUEST
            );
        }
    }
}
