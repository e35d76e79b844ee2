//! # 사용자 응답 DTO
//!
//! 클라이언트에 노출되는 사용자 정보입니다. 비밀번호 해시, 재설정 토큰,
//! `active` 플래그는 포함되지 않습니다.

use serde::Serialize;

use crate::domain::entities::users::{Role, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            name: user.name,
            email: user.email,
            photo: user.photo,
            role: user.role,
            password_changed_at: user
                .password_changed_at
                .and_then(|at| at.try_to_rfc3339_string().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_user_response_hides_secrets() {
        let mut user = User::new("Jonas".into(), "jonas@example.com".into(), "$2b$hash".into());
        user.id = Some(ObjectId::new());
        user.password_reset_token = Some("abc".into());

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordResetToken").is_none());
        assert!(json.get("active").is_none());
        assert_eq!(json["role"], "user");
        assert_eq!(json["_id"].as_str().unwrap().len(), 24);
    }
}
