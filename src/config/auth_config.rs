//! 인증 관련 설정 관리 모듈
//!
//! JWT 서명/만료, 인증 쿠키, 비밀번호 재설정 토큰 설정을 환경 변수에서 읽어옵니다.

use std::env;

/// JWT 토큰 및 인증 쿠키 설정
///
/// | 환경 변수 | 기본값 | 설명 |
/// |-----------|--------|------|
/// | `JWT_SECRET` | `your-secret-key` | HS256 서명 키 |
/// | `JWT_EXPIRATION_HOURS` | `2160` (90일) | 토큰 만료 |
/// | `JWT_COOKIE_EXPIRES_IN` | `90` | `jwt-token` 쿠키 만료 (일) |
pub struct JwtConfig;

impl JwtConfig {
    /// 인증 쿠키 이름
    pub const COOKIE_NAME: &'static str = "jwt-token";

    /// JWT 서명에 사용할 비밀키를 반환합니다.
    ///
    /// 설정되지 않은 경우 개발용 기본값을 사용하며 경고 로그를 남깁니다.
    ///
    /// ```bash
    /// openssl rand -base64 32
    /// ```
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "your-secret-key".to_string()
        })
    }

    /// 토큰 만료 시간 (시간 단위)
    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(90 * 24)
    }

    /// 인증 쿠키 만료 (일 단위)
    pub fn cookie_expiration_days() -> i64 {
        env::var("JWT_COOKIE_EXPIRES_IN")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(90)
    }
}

/// 비밀번호 재설정 토큰 설정
pub struct PasswordResetConfig;

impl PasswordResetConfig {
    /// 재설정 토큰 원문 길이 (바이트, hex 인코딩 전)
    pub const TOKEN_BYTES: usize = 32;

    /// 재설정 토큰 유효 시간 (`PASSWORD_RESET_EXPIRES_MINUTES`, 기본값 10분)
    pub fn expiration_minutes() -> i64 {
        env::var("PASSWORD_RESET_EXPIRES_MINUTES")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|minutes: &i64| *minutes > 0)
            .unwrap_or(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_defaults_when_unset() {
        if env::var("JWT_COOKIE_EXPIRES_IN").is_err() {
            assert_eq!(JwtConfig::cookie_expiration_days(), 90);
        }
        if env::var("JWT_EXPIRATION_HOURS").is_err() {
            assert_eq!(JwtConfig::expiration_hours(), 2160);
        }
    }

    #[test]
    fn test_password_reset_defaults() {
        assert_eq!(PasswordResetConfig::TOKEN_BYTES, 32);
        if env::var("PASSWORD_RESET_EXPIRES_MINUTES").is_err() {
            assert_eq!(PasswordResetConfig::expiration_minutes(), 10);
        }
    }
}
