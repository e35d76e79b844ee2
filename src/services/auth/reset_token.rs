//! 비밀번호 재설정 토큰
//!
//! 원문 토큰은 메일로만 전달되고, DB에는 SHA-256 해시만 저장됩니다.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::config::PasswordResetConfig;

/// 32바이트 난수를 hex로 인코딩한 원문 토큰
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; PasswordResetConfig::TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_hex() {
        let first = generate_reset_token();
        let second = generate_reset_token();
        assert_eq!(first.len(), PasswordResetConfig::TOKEN_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_is_deterministic_sha256() {
        assert_eq!(
            hash_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(hash_reset_token("abc"), hash_reset_token("abd"));
    }
}
