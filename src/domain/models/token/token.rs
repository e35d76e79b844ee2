//! JWT 클레임
//!
//! 토큰에는 사용자 ID와 발급/만료 시각(초 단위)만 담습니다. 역할은 매 요청마다
//! DB에서 다시 읽으므로 토큰에 넣지 않습니다.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ObjectId (hex)
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user_id: &str, issued_at: i64, ttl_seconds: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + ttl_seconds,
        }
    }
}
