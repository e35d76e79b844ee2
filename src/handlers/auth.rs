//! Authentication HTTP Handlers
//!
//! 회원가입, 로그인/로그아웃, 비밀번호 재설정과 변경을 처리합니다.
//! 토큰을 발급하는 모든 응답은 본문의 `token`과 함께 `jwt-token` 쿠키를 설정합니다.
//!
//! | 메서드 | 경로 | 권한 |
//! |--------|------|------|
//! | `POST` | `/api/v1/users/signup` | - |
//! | `POST` | `/api/v1/users/login` | - |
//! | `GET` | `/api/v1/users/logout` | - |
//! | `POST` | `/api/v1/users/forgot-password` | - |
//! | `PATCH` | `/api/v1/users/reset-password/{token}` | - |
//! | `PATCH` | `/api/v1/users/update-my-password` | 로그인 |

use actix_web::cookie::{time::Duration, Cookie};
use actix_web::http::StatusCode;
use actix_web::{get, patch, post, web, HttpResponse};
use serde_json::{json, Value};
use validator::Validate;

use crate::config::{Environment, JwtConfig, ServerConfig};
use crate::core::errors::AppError;
use crate::domain::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::envelope;
use crate::domain::dto::users::request::{
    ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
    UpdatePasswordRequest,
};
use crate::domain::dto::users::response::UserResponse;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::{AuthService, AuthSession};

/// 로그아웃 시 토큰 대신 넣는 값
pub const LOGGED_OUT: &str = "loggedout";

pub fn token_cookie(token: &str, env: &Environment) -> Cookie<'static> {
    Cookie::build(JwtConfig::COOKIE_NAME, token.to_string())
        .path("/")
        .http_only(true)
        .secure(env.is_production())
        .max_age(Duration::days(JwtConfig::cookie_expiration_days()))
        .finish()
}

pub fn logout_cookie() -> Cookie<'static> {
    Cookie::build(JwtConfig::COOKIE_NAME, LOGGED_OUT)
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(10))
        .finish()
}

/// 토큰을 쿠키와 본문으로 내려보냅니다.
fn send_token(session: AuthSession, status: StatusCode) -> HttpResponse {
    let cookie = token_cookie(&session.token, &Environment::current());
    let user = json!(UserResponse::from(session.user));

    HttpResponse::build(status)
        .cookie(cookie)
        .json(envelope::with_token(&session.token, user))
}

#[post("/signup")]
pub async fn signup(payload: web::Json<SignupRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let session = AuthService::instance().signup(payload.into_inner()).await?;
    Ok(send_token(session, StatusCode::CREATED))
}

#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    let session = AuthService::instance().login(payload.into_inner()).await?;
    Ok(send_token(session, StatusCode::OK))
}

#[get("/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(logout_cookie())
        .json(json!({ "status": envelope::SUCCESS }))
}

/// 재설정 토큰 메일 발송
///
/// 재설정 링크는 `PUBLIC_URL` 기준으로 만듭니다.
/// 개발 환경에서는 메일 없이 테스트할 수 있도록 응답에 `resetToken`을 포함합니다.
#[post("/forgot-password")]
pub async fn forgot_password(
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let token = AuthService::instance()
        .forgot_password(&payload.email, &ServerConfig::public_url())
        .await?;

    let mut body = envelope::message("Token sent to email!");
    if Environment::current() == Environment::Development {
        if let Value::Object(map) = &mut body {
            map.insert("resetToken".to_string(), Value::String(token));
        }
    }
    Ok(HttpResponse::Ok().json(body))
}

#[patch("/reset-password/{token}")]
pub async fn reset_password(
    token: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let session = AuthService::instance()
        .reset_password(&token, payload.into_inner())
        .await?;
    Ok(send_token(session, StatusCode::OK))
}

#[patch("/update-my-password", wrap = "AuthMiddleware::required()")]
pub async fn update_my_password(
    user: AuthenticatedUser,
    payload: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user_id = user
        .user
        .id
        .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
    let session = AuthService::instance()
        .update_password(user_id, payload.into_inner())
        .await?;
    Ok(send_token(session, StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cookie_is_secure_only_in_production() {
        let prod = token_cookie("abc", &Environment::Production);
        assert_eq!(prod.name(), JwtConfig::COOKIE_NAME);
        assert_eq!(prod.http_only(), Some(true));
        assert_eq!(prod.secure(), Some(true));

        let dev = token_cookie("abc", &Environment::Development);
        assert_eq!(dev.secure(), Some(false));
    }

    #[test]
    fn test_logout_cookie_expires_quickly() {
        let cookie = logout_cookie();
        assert_eq!(cookie.value(), LOGGED_OUT);
        assert_eq!(cookie.max_age(), Some(Duration::seconds(10)));
    }
}
