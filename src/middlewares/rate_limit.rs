/*!
 * 速率限制中间件
 *
 * 固定时间窗口计数，超过限制返回 429。公开端点（登录、扫码签到、邀请校验）
 * 按客户端 IP 计数，已登录请求按账号计数。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login));
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::middlewares::create_error_response;
use crate::models::ErrorCode;
use crate::models::auth::SessionUser;

/// 全局速率限制缓存
/// 键: 前缀:标识，值: (窗口起点, 请求计数)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (Instant, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(600))
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    /// 创建新的速率限制器
    ///
    /// # 参数
    /// - `max_requests`: 时间窗口内允许的最大请求数
    /// - `window_secs`: 时间窗口（秒）
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 扫码签到限制：30次/分钟/IP
    pub fn mark_attendance() -> Self {
        Self::new(30, 60).with_prefix("attendance_mark")
    }

    /// 邀请校验与接受限制：10次/分钟/IP（防止枚举令牌）
    pub fn invitation() -> Self {
        Self::new(10, 60).with_prefix("invitation")
    }
}

/// 窗口内计数一次，窗口过期则重新开始；超限后继续累加
fn register_hit(entry: Option<(Instant, u32)>, now: Instant, window: Duration) -> (Instant, u32) {
    match entry {
        Some((start, count)) if now.duration_since(start) < window => {
            (start, count.saturating_add(1))
        }
        _ => (now, 1),
    }
}

/// 写入 X-RateLimit-* 响应头
fn insert_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_secs: u64) {
    for (name, value) in [
        ("x-ratelimit-limit", u64::from(limit)),
        ("x-ratelimit-remaining", u64::from(remaining)),
        ("x-ratelimit-reset", reset_secs),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }
}

/// 从请求中提取客户端 IP
///
/// 安全注意事项：
/// - 如果服务部署在反向代理后面，需要在反向代理中配置正确的 X-Forwarded-For / X-Real-IP 头
/// - 此实现会验证 IP 格式，防止伪造的无效头导致问题
/// - 在不可信网络中直接暴露服务时，攻击者可能伪造转发头来绕过限制
fn extract_client_ip(req: &ServiceRequest) -> String {
    // 尝试从连接信息获取真实 IP（最可信）
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    // 如果连接信息有有效 IP，优先使用
    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 从 X-Forwarded-For 头获取（用于反向代理场景）
    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    // 从 X-Real-IP 头获取
    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    // 如果都没有有效 IP，使用连接信息的默认值
    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

/// 验证 IP 地址格式是否有效
fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

/// 从请求中提取账号 ID（如果已认证）
fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    req.extensions().get::<SessionUser>().map(|u| u.user.id)
}

/// 创建速率限制错误响应
fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    let mut response = create_error_response(
        StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::RateLimitExceeded,
        "Too many requests, please try again later",
    );
    response
        .headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            // 构建限制键
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{}", id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if key_prefix.is_empty() {
                identifier
            } else {
                format!("{}:{}", key_prefix, identifier)
            };

            let now = Instant::now();
            let window = Duration::from_secs(window_secs);
            let (start, count) = RATE_LIMIT_CACHE
                .entry(cache_key.clone())
                .and_upsert_with(|existing| {
                    std::future::ready(register_hit(
                        existing.map(|e| e.into_value()),
                        now,
                        window,
                    ))
                })
                .await
                .into_value();
            let reset_secs = window
                .saturating_sub(now.duration_since(start))
                .as_secs()
                .max(1);

            if count > max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (limit: {}/{}s)",
                    cache_key, max_requests, window_secs
                );
                let mut response = create_rate_limit_response(reset_secs);
                insert_limit_headers(response.headers_mut(), max_requests, 0, reset_secs);
                return Ok(req.into_response(response.map_into_right_body()));
            }

            // 继续处理请求
            let mut res = srv.call(req).await?.map_into_left_body();
            insert_limit_headers(
                res.headers_mut(),
                max_requests,
                max_requests - count,
                reset_secs,
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        assert_eq!(RateLimit::mark_attendance().max_requests, 30);
        assert_eq!(RateLimit::invitation().key_prefix, "invitation");
    }

    #[test]
    fn test_fixed_window_counting() {
        let window = Duration::from_secs(60);
        let t0 = Instant::now();

        let mut entry = None;
        for expected in 1..=4 {
            let updated = register_hit(entry, t0 + Duration::from_secs(expected), window);
            assert_eq!(updated, (t0, expected as u32));
            entry = Some(updated);
        }

        let later = t0 + Duration::from_secs(61);
        assert_eq!(register_hit(entry, later, window), (later, 1));
    }

    fn header<B>(resp: &ServiceResponse<B>, name: &str) -> Option<String> {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[actix_web::test]
    async fn test_limit_headers_and_rejection() {
        use actix_web::{App, test as actix_test, web};

        let app = actix_test::init_service(App::new().service(
            web::resource("/ping")
                .wrap(RateLimit::new(2, 60).with_prefix("header_check"))
                .to(|| async { HttpResponse::Ok().finish() }),
        ))
        .await;
        let ping = || {
            actix_test::TestRequest::get()
                .uri("/ping")
                .peer_addr("10.9.9.9:5000".parse().unwrap())
                .to_request()
        };

        let resp = actix_test::call_service(&app, ping()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "x-ratelimit-limit").as_deref(), Some("2"));
        assert_eq!(header(&resp, "x-ratelimit-remaining").as_deref(), Some("1"));

        let resp = actix_test::call_service(&app, ping()).await;
        assert_eq!(header(&resp, "x-ratelimit-remaining").as_deref(), Some("0"));

        let resp = actix_test::call_service(&app, ping()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(header(&resp, "retry-after").is_some());
        assert_eq!(header(&resp, "x-ratelimit-remaining").as_deref(), Some("0"));
    }
}
