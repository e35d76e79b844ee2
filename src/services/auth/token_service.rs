//! JWT 토큰 관리 서비스 구현
//!
//! HS256 서명 토큰의 발급과 검증, `Authorization` 헤더 파싱을 담당합니다.
//! 토큰에는 사용자 ID만 담기며, 역할과 비밀번호 변경 여부는 검증 후 DB에서 확인합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;

use crate::{
    config::JwtConfig,
    core::errors::{AppError, AppResult},
    domain::models::token::TokenClaims,
};

/// 클레임을 서명해 토큰 문자열을 만듭니다.
pub fn encode_claims(claims: &TokenClaims, secret: &str) -> AppResult<String> {
    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
}

/// 서명과 만료를 검증하고 클레임을 반환합니다.
///
/// 만료 → "Your token has expired! Please log in again."
/// 그 외 → "Invalid token. Please log in again!"
pub fn decode_claims(token: &str, secret: &str) -> AppResult<TokenClaims> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    Ok(decode::<TokenClaims>(token, &decoding_key, &validation)?.claims)
}

/// `Bearer <token>` 형식에서 토큰만 추출
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[service(name = "token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    /// 사용자 ID로 토큰 발급 (`JWT_EXPIRES_IN` 시간 유효)
    pub fn sign_token(&self, user_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let ttl = Duration::hours(JwtConfig::expiration_hours());
        let claims = TokenClaims::new(user_id, now.timestamp(), ttl.num_seconds());

        encode_claims(&claims, &JwtConfig::secret())
    }

    pub fn verify_token(&self, token: &str) -> AppResult<TokenClaims> {
        decode_claims(token, &JwtConfig::secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough";

    #[test]
    fn test_encode_then_decode() {
        let now = Utc::now().timestamp();
        let claims = TokenClaims::new("5c8a1d5b0190b214360dc057", now, 3600);

        let token = encode_claims(&claims, SECRET).unwrap();
        let decoded = decode_claims(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_expired_token_message() {
        let issued = Utc::now().timestamp() - 7200;
        let token = encode_claims(&TokenClaims::new("abc", issued, 60), SECRET).unwrap();

        match decode_claims(&token, SECRET) {
            Err(AppError::AuthenticationError(msg)) => {
                assert_eq!(msg, "Your token has expired! Please log in again.")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let now = Utc::now().timestamp();
        let token = encode_claims(&TokenClaims::new("abc", now, 60), SECRET).unwrap();

        match decode_claims(&token, "another-secret") {
            Err(AppError::AuthenticationError(msg)) => {
                assert_eq!(msg, "Invalid token. Please log in again!")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(decode_claims("not-a-jwt", SECRET).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcg=="), None);
    }
}
