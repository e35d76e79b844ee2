//! # 사용자 정보 수정 요청 DTO

use mongodb::bson::Document;
use serde::Deserialize;
use validator::Validate;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::Role;
use crate::utils::string_utils::{deserialize_optional_string, normalize_email};

pub const PASSWORD_UPDATE_REJECTED: &str =
    "This route is not for password updates. Please use /update-my-password";

/// 본인 정보 수정 (`PATCH /users/update-me`)
///
/// `name`, `email`만 반영됩니다. 비밀번호 필드가 포함되면 요청 전체를 거부합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 2, max = 40, message = "A user name must have between 2 and 40 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<serde_json::Value>,

    #[serde(default)]
    pub password_confirm: Option<serde_json::Value>,
}

impl UpdateMeRequest {
    pub fn ensure_no_password(&self) -> AppResult<()> {
        if self.password.is_some() || self.password_confirm.is_some() {
            return Err(AppError::ValidationError(PASSWORD_UPDATE_REJECTED.to_string()));
        }
        Ok(())
    }

    /// 허용된 필드만 담은 `$set` 문서
    pub fn to_set_document(&self) -> AppResult<Document> {
        self.ensure_no_password()?;

        let mut set = Document::new();
        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        if let Some(email) = &self.email {
            set.insert("email", normalize_email(email));
        }

        if set.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        Ok(set)
    }
}

/// 관리자용 사용자 수정 (`PATCH /users/{id}`)
///
/// 비밀번호는 이 경로로 바꿀 수 없습니다.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 2, max = 40, message = "A user name must have between 2 and 40 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub photo: Option<String>,

    #[serde(default)]
    pub role: Option<Role>,

    #[serde(default)]
    pub password: Option<serde_json::Value>,
}

impl AdminUpdateUserRequest {
    pub fn to_set_document(&self) -> AppResult<Document> {
        if self.password.is_some() {
            return Err(AppError::ValidationError(PASSWORD_UPDATE_REJECTED.to_string()));
        }

        let mut set = Document::new();
        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        if let Some(email) = &self.email {
            set.insert("email", normalize_email(email));
        }
        if let Some(photo) = &self.photo {
            set.insert("photo", photo.as_str());
        }
        if let Some(role) = self.role {
            set.insert("role", role.as_str());
        }

        if set.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_me_filters_fields() {
        let req: UpdateMeRequest = serde_json::from_value(serde_json::json!({
            "name": " New Name ",
            "email": "NEW@Example.com",
            "role": "admin",
        }))
        .unwrap();

        let set = req.to_set_document().unwrap();
        assert_eq!(set.get_str("name").unwrap(), "New Name");
        assert_eq!(set.get_str("email").unwrap(), "new@example.com");
        assert!(!set.contains_key("role"));
    }

    #[test]
    fn test_update_me_rejects_password() {
        let req: UpdateMeRequest = serde_json::from_value(serde_json::json!({
            "password": "newpass123",
            "passwordConfirm": "newpass123",
        }))
        .unwrap();

        match req.to_set_document() {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, PASSWORD_UPDATE_REJECTED),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_admin_update_sets_role() {
        let req: AdminUpdateUserRequest =
            serde_json::from_value(serde_json::json!({ "role": "lead-guide" })).unwrap();
        let set = req.to_set_document().unwrap();
        assert_eq!(set.get_str("role").unwrap(), "lead-guide");
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let req: UpdateMeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.to_set_document().is_err());
    }
}
