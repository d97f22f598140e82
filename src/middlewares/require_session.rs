/*!
 * 会话认证中间件
 *
 * 校验不透明的会话令牌，确保只有已登录且账号有效的用户才能访问受保护的路由。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireSession;
 *
 * web::scope("/api/v1/attendance")
 *     .wrap(RequireSession)
 *     .route("/events/{event_id}", web::get().to(list_event_attendance));
 *
 * async fn handler(req: HttpRequest) -> Result<HttpResponse> {
 *     let user = RequireSession::extract_session_user(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 令牌取自 `Authorization: Bearer <token>`，缺失时回退到 `X-Session-Token`
 * 2. 先查缓存 `session:{token}`，未命中再查 `user_sessions` 表
 * 3. 过期会话会被删除；账号停用或不存在同样返回 401
 * 4. 校验通过后 `SessionUser` 写入请求扩展，并缓存至会话过期或默认 TTL（取较小者）
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::middlewares::create_error_response;
use crate::models::ErrorCode;
use crate::models::auth::{SessionRejection, SessionUser};
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{AUTHORIZATION, HeaderMap},
    web,
};
use chrono::Utc;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

const BEARER_PREFIX: &str = "Bearer ";
const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

#[derive(Clone)]
pub struct RequireSession;

/// 当前请求使用的会话令牌
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// 会话缓存键
pub fn session_cache_key(token: &str) -> String {
    format!("session:{token}")
}

/// 从请求头中读取令牌
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    fn non_blank(s: &str) -> Option<String> {
        Some(s.trim()).filter(|t| !t.is_empty()).map(str::to_string)
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .and_then(non_blank)
        .or_else(|| {
            headers
                .get(SESSION_TOKEN_HEADER)
                .and_then(|h| h.to_str().ok())
                .and_then(non_blank)
        })
}

enum AuthFailure {
    Rejected(SessionRejection),
    Internal(String),
}

impl AuthFailure {
    fn into_response(self) -> actix_web::HttpResponse {
        match self {
            AuthFailure::Rejected(rejection) => {
                let code = match rejection {
                    SessionRejection::Expired => ErrorCode::SessionExpired,
                    SessionRejection::AccountInactive => ErrorCode::AccountInactive,
                    SessionRejection::Missing | SessionRejection::Invalid => {
                        ErrorCode::Unauthorized
                    }
                };
                create_error_response(StatusCode::UNAUTHORIZED, code, rejection.message())
            }
            AuthFailure::Internal(msg) => {
                error!("Session check failed: {}", msg);
                create_error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Internal server error",
                )
            }
        }
    }
}

async fn authenticate(req: &ServiceRequest, token: &str) -> Result<SessionUser, AuthFailure> {
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .ok_or_else(|| AuthFailure::Internal("Cache not found in app data".to_string()))?
        .get_ref()
        .clone();
    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| AuthFailure::Internal("Storage not found in app data".to_string()))?
        .get_ref()
        .clone();

    let now = Utc::now();
    let cache_key = session_cache_key(token);

    if let CacheResult::Found(json) = cache.get_raw(&cache_key).await {
        match serde_json::from_str::<SessionUser>(&json) {
            Ok(user) if !user.is_expired(now) => return Ok(user),
            _ => cache.remove(&cache_key).await,
        }
    }

    let session = storage
        .get_session_by_token(token)
        .await
        .map_err(|e| AuthFailure::Internal(e.to_string()))?
        .ok_or(AuthFailure::Rejected(SessionRejection::Invalid))?;

    let user = storage
        .get_user_by_id(session.user_id)
        .await
        .map_err(|e| AuthFailure::Internal(e.to_string()))?;

    if let Err(rejection) = SessionUser::check(&session, user.as_ref(), now) {
        if rejection == SessionRejection::Expired
            && let Err(e) = storage.delete_session(token).await
        {
            error!("Failed to delete expired session {}: {}", session.id, e);
        }
        return Err(AuthFailure::Rejected(rejection));
    }
    let Some(user) = user else {
        return Err(AuthFailure::Rejected(SessionRejection::Invalid));
    };

    let roles = storage
        .list_user_roles(user.id)
        .await
        .map_err(|e| AuthFailure::Internal(e.to_string()))?;

    let session_user = SessionUser {
        user,
        roles,
        session_expires_at: session.expires_at,
    };

    let remaining = (session.expires_at - now).num_seconds().max(0) as u64;
    let ttl = AppConfig::get().session_cache_ttl(remaining);
    if ttl > 0
        && let Ok(json) = serde_json::to_string(&session_user)
    {
        cache.insert_raw(cache_key, json, ttl).await;
    }

    Ok(session_user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行给 CORS 处理
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let Some(token) = extract_token(req.headers()) else {
                info!("Missing session token for request to {}", req.path());
                let response = AuthFailure::Rejected(SessionRejection::Missing).into_response();
                return Ok(req.into_response(response.map_into_right_body()));
            };

            match authenticate(&req, &token).await {
                Ok(session_user) => {
                    debug!("Session authentication successful for ID: {}", session_user.user.id);
                    req.extensions_mut().insert(session_user);
                    req.extensions_mut().insert(SessionToken(token));
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(failure) => {
                    if let AuthFailure::Rejected(rejection) = &failure {
                        info!(
                            "Session authentication failed for request to {}: {}",
                            req.path(),
                            rejection.message()
                        );
                    }
                    Ok(req.into_response(failure.into_response().map_into_right_body()))
                }
            }
        })
    }
}

impl RequireSession {
    /// 从请求扩展中提取会话用户
    /// 此函数应该在应用了 RequireSession 中间件的路由处理程序中使用
    pub fn extract_session_user(req: &HttpRequest) -> Option<SessionUser> {
        req.extensions().get::<SessionUser>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<SessionUser>().map(|u| u.user.id)
    }

    pub fn extract_token(req: &HttpRequest) -> Option<String> {
        req.extensions().get::<SessionToken>().map(|t| t.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::roles::entities::{Role, RoleAssignment};
    use crate::models::users::entities::NewUser;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, http::header::HeaderValue};
    use chrono::Duration;

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireSession::extract_session_user(&req) {
            Some(u) => HttpResponse::Ok().body(format!("{}:{}", u.user.id, u.roles.len())),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn setup() -> (Arc<dyn Storage>, Arc<dyn ObjectCache>, i64) {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::connect("sqlite::memory:", 1, 5)
                .await
                .unwrap(),
        );
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 300));
        let user = storage
            .create_user(NewUser {
                email: "admin@school.test".to_string(),
                password_hash: "x".to_string(),
                full_name: None,
            })
            .await
            .unwrap();
        storage
            .assign_role(user.id, RoleAssignment::global(Role::GlobalAdmin))
            .await
            .unwrap();
        (storage, cache, user.id)
    }

    #[test]
    fn test_extract_token_precedence() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(
            actix_web::http::header::HeaderName::from_static("x-session-token"),
            HeaderValue::from_static("fallback"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("fallback"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer primary"));
        assert_eq!(extract_token(&headers).as_deref(), Some("primary"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_token(&headers).as_deref(), Some("fallback"));
    }

    #[actix_web::test]
    async fn test_session_gate() {
        let (storage, cache, user_id) = setup().await;
        storage
            .create_session(user_id, "good", Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        storage
            .create_session(user_id, "old", Utc::now() - Duration::minutes(1))
            .await
            .unwrap();

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(cache.clone()))
                .service(
                    web::scope("/p")
                        .wrap(RequireSession)
                        .route("/me", web::get().to(whoami)),
                ),
        )
        .await;

        let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/p/me").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/p/me")
                .insert_header((AUTHORIZATION, "Bearer nope"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/p/me")
                .insert_header((AUTHORIZATION, "Bearer good"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = actix_test::read_body(resp).await;
        assert_eq!(body, format!("{user_id}:1").as_bytes());
        assert!(matches!(
            cache.get_raw(&session_cache_key("good")).await,
            CacheResult::Found(_)
        ));

        let resp = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/p/me")
                .insert_header((SESSION_TOKEN_HEADER, "old"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(storage.get_session_by_token("old").await.unwrap().is_none());
    }
}
