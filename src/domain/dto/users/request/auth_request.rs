//! # 인증 요청 DTO
//!
//! 회원가입, 로그인, 비밀번호 재설정/변경 요청 본문입니다.
//! JSON 필드는 camelCase(`passwordConfirm`, `currentPassword`)를 사용합니다.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::utils::string_utils::deserialize_trimmed_string;

const PASSWORD_MISMATCH: &str = "Passwords are not the same!";

fn passwords_match(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::new("passwords_mismatch").with_message(PASSWORD_MISMATCH.into()));
    }
    Ok(())
}

/// 회원가입 요청
///
/// ```json
/// {
///   "name": "Jonas",
///   "email": "jonas@example.com",
///   "password": "pass1234",
///   "passwordConfirm": "pass1234"
/// }
/// ```
///
/// `role`은 받지 않습니다. 모든 신규 가입자는 `user` 역할입니다.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_signup_passwords"))]
pub struct SignupRequest {
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(min = 2, max = 40, message = "A user name must have between 2 and 40 characters"))]
    pub name: String,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 8, message = "A password must have at least 8 characters"))]
    pub password: String,

    pub password_confirm: String,
}

fn validate_signup_passwords(req: &SignupRequest) -> Result<(), ValidationError> {
    passwords_match(&req.password, &req.password_confirm)
}

/// 로그인 요청
///
/// 필드 누락은 검증 에러가 아니라 `400 Please provide email and password`로 처리되므로
/// 두 필드 모두 `Option`입니다.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// 비어 있지 않은 (email, password) 쌍
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

/// 비밀번호 재설정 메일 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
}

/// 재설정 토큰으로 새 비밀번호 설정
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_reset_passwords"))]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "A password must have at least 8 characters"))]
    pub password: String,

    pub password_confirm: String,
}

fn validate_reset_passwords(req: &ResetPasswordRequest) -> Result<(), ValidationError> {
    passwords_match(&req.password, &req.password_confirm)
}

/// 로그인한 사용자의 비밀번호 변경
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_new_passwords"))]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Please provide your current password"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "A password must have at least 8 characters"))]
    pub new_password: String,

    pub new_password_confirm: String,
}

fn validate_new_passwords(req: &UpdatePasswordRequest) -> Result<(), ValidationError> {
    passwords_match(&req.new_password, &req.new_password_confirm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(password: &str, confirm: &str) -> SignupRequest {
        serde_json::from_value(serde_json::json!({
            "name": "  Jonas  ",
            "email": "jonas@example.com",
            "password": password,
            "passwordConfirm": confirm,
        }))
        .unwrap()
    }

    #[test]
    fn test_signup_trims_name_and_validates() {
        let req = signup("pass1234", "pass1234");
        assert_eq!(req.name, "Jonas");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_signup_password_mismatch() {
        let errors = signup("pass1234", "pass12345").validate().unwrap_err();
        assert!(errors.to_string().contains(PASSWORD_MISMATCH));
    }

    #[test]
    fn test_signup_short_password() {
        assert!(signup("short", "short").validate().is_err());
    }

    #[test]
    fn test_login_credentials_require_both_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"email": "a@b.io"}"#).unwrap();
        assert!(req.credentials().is_none());

        let req: LoginRequest =
            serde_json::from_str(r#"{"email": " a@b.io ", "password": "pass1234"}"#).unwrap();
        assert_eq!(req.credentials(), Some(("a@b.io", "pass1234")));
    }

    #[test]
    fn test_update_password_mismatch() {
        let req: UpdatePasswordRequest = serde_json::from_value(serde_json::json!({
            "currentPassword": "pass1234",
            "newPassword": "newpass123",
            "newPasswordConfirm": "different1",
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
