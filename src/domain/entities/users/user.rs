//! User Entity Implementation
//!
//! `users` 컬렉션 문서와 매핑되는 사용자 엔티티입니다.
//! 비밀번호 해시, 비밀번호 변경 시각, 재설정 토큰, 소프트 삭제 플래그를 포함합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 기본 프로필 사진
pub const DEFAULT_PHOTO: &str = "default.jpg";

/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Guide => "guide",
            Role::LeadGuide => "lead-guide",
            Role::Admin => "admin",
        }
    }
}

/// 사용자 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    /// 소문자로 정규화된 이메일 (unique)
    pub email: String,
    #[serde(default = "default_photo")]
    pub photo: String,
    #[serde(default)]
    pub role: Role,
    /// bcrypt 해시. 캐시에 저장할 때는 비워 둡니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime>,
    /// 재설정 토큰 원문의 SHA-256 hex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_reset_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_reset_expires: Option<DateTime>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_photo() -> String {
    DEFAULT_PHOTO.to_string()
}

fn default_active() -> bool {
    true
}

impl User {
    /// 새 사용자 생성. 역할은 항상 `user`로 시작합니다.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            name,
            email,
            photo: default_photo(),
            role: Role::User,
            password: Some(password_hash),
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            active: true,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 토큰 발급(`iat`, 초 단위) 이후에 비밀번호가 바뀌었는지 확인합니다.
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => issued_at < changed_at.timestamp_millis() / 1000,
            None => false,
        }
    }

    /// 평문 비밀번호를 저장된 해시와 비교합니다.
    pub fn correct_password(&self, candidate: &str) -> bool {
        self.password
            .as_deref()
            .map(|hash| bcrypt::verify(candidate, hash).unwrap_or(false))
            .unwrap_or(false)
    }

    /// 캐시에 저장할 사본 (비밀번호/재설정 토큰 제거)
    pub fn without_secrets(&self) -> Self {
        Self {
            password: None,
            password_reset_token: None,
            password_reset_expires: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let hash = bcrypt::hash("pass1234", 4).unwrap();
        User::new("Jonas".into(), "jonas@example.com".into(), hash)
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::LeadGuide).unwrap(), "\"lead-guide\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_changed_password_after() {
        let mut user = sample_user();
        assert!(!user.changed_password_after(1_000));

        user.password_changed_at = Some(DateTime::from_millis(2_000_500));
        assert!(user.changed_password_after(1_999));
        assert!(!user.changed_password_after(2_000));
        assert!(!user.changed_password_after(3_000));
    }

    #[test]
    fn test_correct_password() {
        let user = sample_user();
        assert!(user.correct_password("pass1234"));
        assert!(!user.correct_password("wrong-password"));
        assert!(!user.without_secrets().correct_password("pass1234"));
    }

    #[test]
    fn test_new_user_defaults() {
        let user = sample_user();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.photo, DEFAULT_PHOTO);
        assert!(user.active);
    }
}
