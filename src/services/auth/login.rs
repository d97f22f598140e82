use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::services::{bad_request, internal_error};
use crate::utils::password::verify_password;
use crate::utils::random_code::generate_session_token;

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    let email = login_request.email.trim();
    if email.is_empty() || login_request.password.is_empty() {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Email and password are required",
        ));
    }

    // 1. 账号与密码，两种失败返回同一条信息
    let mut user = match storage.get_user_by_email(email).await {
        Ok(Some(user)) if verify_password(&login_request.password, &user.password_hash) => user,
        Ok(_) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                INVALID_CREDENTIALS,
            )));
        }
        Err(e) => return Ok(internal_error("Login lookup failed", e)),
    };

    // 2. 停用账号
    if !user.is_active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is inactive",
        )));
    }

    // 3. 创建会话
    let token = generate_session_token(config.session.token_length);
    let expires_at = Utc::now() + config.session_ttl();
    if let Err(e) = storage.create_session(user.id, &token, expires_at).await {
        return Ok(internal_error("Failed to create session", e));
    }

    match storage.update_last_login(user.id).await {
        Ok(_) => user.last_login = Some(Utc::now()),
        Err(e) => warn!("Failed to update last login for user {}: {}", user.id, e),
    }

    let roles = match storage.list_user_roles(user.id).await {
        Ok(roles) => roles,
        Err(e) => return Ok(internal_error("Failed to load roles", e)),
    };

    info!("User {} logged in successfully", user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LoginResponse {
            token,
            expires_at,
            user,
            roles,
        },
        "Login successful",
    )))
}
