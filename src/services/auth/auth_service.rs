//! # 인증 서비스
//!
//! 회원가입, 로그인, 비밀번호 재설정/변경과 요청 토큰 검증을 담당합니다.
//!
//! ```text
//! Authorization: Bearer <jwt>  또는  Cookie: jwt-token=<jwt>
//!        │
//!        ▼
//!  verify_token ──▶ find_active_by_id ──▶ changed_password_after(iat)?
//!    (401)              (401)                    (401)
//!        │
//!        ▼
//!  AuthenticatedUser → 요청 extensions
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use mongodb::bson::{self, oid::ObjectId, DateTime};
use singleton_macro::service;

use crate::{
    config::{PasswordConfig, PasswordResetConfig},
    core::errors::{AppError, AppResult},
    domain::dto::users::request::{
        LoginRequest, ResetPasswordRequest, SignupRequest, UpdatePasswordRequest,
    },
    domain::entities::users::User,
    repositories::crud::{CrudRepository, WriteContext},
    repositories::users::UserRepository,
    services::auth::reset_token::{generate_reset_token, hash_reset_token},
    services::auth::token_service::TokenService,
    services::email::EmailService,
};

pub const NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access.";
pub const USER_NO_LONGER_EXISTS: &str = "The user belonging to this token does no longer exist.";
pub const PASSWORD_CHANGED: &str = "User has changed password! Please log in again.";
pub const MISSING_CREDENTIALS: &str = "Please provide email and password";
pub const INCORRECT_CREDENTIALS: &str = "Incorrect email or password";
pub const EMAIL_SEND_FAILED: &str = "There was an error sending the email. Try again later!";

/// 토큰 발급 결과
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    /// 비밀번호 해시가 제거된 사용자
    pub user: User,
}

/// 토큰 검증 이후 단계: 사용자 존재 여부와 비밀번호 변경 시점 확인
pub fn check_token_owner(user: Option<User>, issued_at: i64) -> AppResult<User> {
    let user = user.ok_or_else(|| AppError::AuthenticationError(USER_NO_LONGER_EXISTS.to_string()))?;

    if user.changed_password_after(issued_at) {
        return Err(AppError::AuthenticationError(PASSWORD_CHANGED.to_string()));
    }
    Ok(user)
}

/// 새 비밀번호의 변경 시각. 같은 초에 발급되는 토큰이 거부되지 않도록 1초 앞당깁니다.
pub fn password_changed_stamp() -> DateTime {
    DateTime::from_millis(Utc::now().timestamp_millis() - 1000)
}

pub fn reset_url(base_url: &str, token: &str) -> String {
    format!(
        "{}/api/v1/users/reset-password/{}",
        base_url.trim_end_matches('/'),
        token
    )
}

#[service(name = "auth")]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    token_service: Arc<TokenService>,
    email_service: Arc<EmailService>,
}

impl AuthService {
    fn issue(&self, user: User) -> AppResult<AuthSession> {
        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let token = self.token_service.sign_token(&user_id)?;

        Ok(AuthSession {
            token,
            user: user.without_secrets(),
        })
    }

    /// 회원가입. 역할은 항상 `user`로 생성됩니다.
    pub async fn signup(&self, request: SignupRequest) -> AppResult<AuthSession> {
        let document = self
            .user_repo
            .new_document(request, &WriteContext::default())?;
        let document = self.user_repo.insert(document).await?;
        let user: User = bson::from_document(document)?;

        log::info!("신규 가입: {}", user.email);
        self.issue(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthSession> {
        let (email, password) = request
            .credentials()
            .ok_or_else(|| AppError::ValidationError(MISSING_CREDENTIALS.to_string()))?;

        let user = match self.user_repo.find_by_email(email).await? {
            Some(user) if user.correct_password(password) => user,
            _ => {
                log::warn!("로그인 실패: {}", email);
                return Err(AppError::AuthenticationError(INCORRECT_CREDENTIALS.to_string()));
            }
        };

        self.issue(user)
    }

    /// 재설정 토큰을 만들어 메일로 보내고 원문 토큰을 반환합니다.
    ///
    /// 메일 전송에 실패하면 저장한 토큰을 지우고 500을 반환합니다.
    pub async fn forgot_password(&self, email: &str, base_url: &str) -> AppResult<String> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("There is no user with email address.".to_string()))?;
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let token = generate_reset_token();
        let expires = Utc::now() + Duration::minutes(PasswordResetConfig::expiration_minutes());
        self.user_repo
            .set_reset_token(
                user_id,
                Some((
                    hash_reset_token(&token),
                    DateTime::from_millis(expires.timestamp_millis()),
                )),
            )
            .await?;

        if let Err(e) = self
            .email_service
            .send_password_reset(&user.email, &reset_url(base_url, &token))
            .await
        {
            log::error!("재설정 메일 전송 실패 ({}): {}", user.email, e);
            self.user_repo.set_reset_token(user_id, None).await?;
            return Err(AppError::EmailDeliveryError(EMAIL_SEND_FAILED.to_string()));
        }

        Ok(token)
    }

    /// 재설정 토큰으로 비밀번호를 바꾸고 바로 로그인시킵니다.
    pub async fn reset_password(&self, token: &str, request: ResetPasswordRequest) -> AppResult<AuthSession> {
        let user = self
            .user_repo
            .find_by_reset_token(&hash_reset_token(token), DateTime::now())
            .await?
            .ok_or_else(|| AppError::ValidationError("Token is invalid or has expired".to_string()))?;

        self.apply_new_password(user, &request.password).await
    }

    /// 현재 비밀번호 확인 후 변경
    pub async fn update_password(
        &self,
        user_id: ObjectId,
        request: UpdatePasswordRequest,
    ) -> AppResult<AuthSession> {
        let user = self
            .user_repo
            .find_with_password(user_id)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(USER_NO_LONGER_EXISTS.to_string()))?;

        if !user.correct_password(&request.current_password) {
            return Err(AppError::AuthenticationError(
                "Your current password is wrong.".to_string(),
            ));
        }

        self.apply_new_password(user, &request.new_password).await
    }

    async fn apply_new_password(&self, mut user: User, password: &str) -> AppResult<AuthSession> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let hash = bcrypt::hash(password, PasswordConfig::bcrypt_cost())?;
        let changed_at = password_changed_stamp();

        self.user_repo.set_password(user_id, &hash, changed_at).await?;

        user.password_changed_at = Some(changed_at);
        self.issue(user)
    }

    /// 보호된 경로의 토큰 검증
    pub async fn authenticate(&self, token: Option<&str>) -> AppResult<User> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::AuthenticationError(NOT_LOGGED_IN.to_string()))?;

        let claims = self.token_service.verify_token(token)?;
        let user_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| AppError::AuthenticationError(USER_NO_LONGER_EXISTS.to_string()))?;

        let user = self.user_repo.find_active_by_id(user_id).await?;
        check_token_owner(user, claims.iat)
    }

    /// 화면 렌더링용. 어떤 이유로든 실패하면 비로그인으로 취급합니다.
    pub async fn current_user(&self, token: Option<&str>) -> Option<User> {
        match self.authenticate(token).await {
            Ok(user) => Some(user),
            Err(e) => {
                if token.is_some() {
                    log::debug!("선택적 인증 무시: {}", e);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_changed_at(millis: i64) -> User {
        let mut user = User::new("Jonas".into(), "jonas@example.com".into(), "$2b$hash".into());
        user.password_changed_at = Some(DateTime::from_millis(millis));
        user
    }

    #[test]
    fn test_missing_user_is_rejected() {
        match check_token_owner(None, 0) {
            Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, USER_NO_LONGER_EXISTS),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_token_issued_before_password_change_is_rejected() {
        let user = user_changed_at(1_700_000_000_000);

        match check_token_owner(Some(user.clone()), 1_699_999_000) {
            Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, PASSWORD_CHANGED),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(check_token_owner(Some(user), 1_700_000_500).is_ok());
    }

    #[test]
    fn test_password_stamp_precedes_new_token() {
        let stamp = password_changed_stamp();
        let user = user_changed_at(stamp.timestamp_millis());
        assert!(!user.changed_password_after(Utc::now().timestamp()));
    }

    #[test]
    fn test_reset_url() {
        assert_eq!(
            reset_url("http://localhost:3000/", "abc"),
            "http://localhost:3000/api/v1/users/reset-password/abc"
        );
    }
}
