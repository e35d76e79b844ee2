//! # 인증된 사용자 추출기
//!
//! 인증 미들웨어가 요청 extensions에 넣어 둔 사용자를 핸들러 인자로 꺼내는 타입들입니다.
//!
//! ```rust,ignore
//! async fn get_me(user: AuthenticatedUser) -> AppResult<HttpResponse> { ... }
//! async fn overview(user: OptionalUser) -> AppResult<HttpResponse> { ... }
//! ```

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::core::errors::AppError;
use crate::domain::entities::users::{Role, User};

/// 요청에 바인딩된 로그인 사용자
///
/// 비밀번호 해시와 재설정 토큰은 제거된 상태로 저장됩니다.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn new(user: User) -> Self {
        Self { user: user.without_secrets() }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "You are not logged in! Please log in to get access.".to_string(),
            ))),
        }
    }
}

/// 로그인 여부와 관계없이 접근 가능한 경로용. 서버 렌더링 페이지에서 사용합니다.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn guide() -> User {
        let mut user = User::new("Guide".into(), "guide@example.com".into(), "$2b$hash".into());
        user.role = Role::Guide;
        user
    }

    #[test]
    fn test_new_strips_password_hash() {
        let auth = AuthenticatedUser::new(guide());
        assert!(auth.user.password.is_none());
        assert!(auth.has_any_role(&[Role::Admin, Role::Guide]));
        assert!(!auth.is_admin());
    }

    #[actix_web::test]
    async fn test_extractor_reads_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthenticatedUser::new(guide()));

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.role(), Role::Guide);
    }

    #[actix_web::test]
    async fn test_extractor_fails_without_user() {
        let req = TestRequest::default().to_http_request();
        assert!(AuthenticatedUser::extract(&req).await.is_err());

        let optional = OptionalUser::extract(&req).await.unwrap();
        assert!(optional.0.is_none());
    }
}
