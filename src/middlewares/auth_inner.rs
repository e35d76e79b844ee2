//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::config::JwtConfig;
use crate::core::AppError;
use crate::domain::auth::authenticated_user::AuthenticatedUser;
use crate::domain::auth::authentication_request::{AuthMode, RequiredRole};
use crate::services::auth::token_service::extract_bearer_token;
use crate::services::auth::AuthService;

pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action";

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_service = AuthService::instance();

            match mode {
                AuthMode::Required => {
                    let token = extract_token(&req);
                    let outcome = match auth_service.authenticate(token.as_deref()).await {
                        Ok(user) => authorize(user, required_role.as_ref()),
                        Err(err) => Err(err),
                    };

                    match outcome {
                        Ok(user) => {
                            log::debug!("인증 성공: {} ({})", user.user.email, user.role().as_str());
                            req.extensions_mut().insert(user);
                        }
                        Err(err) => {
                            log::warn!("인증 실패 [{} {}]: {}", req.method(), req.path(), err);
                            let response = err.error_response();
                            let (req, _) = req.into_parts();
                            return Ok(ServiceResponse::new(req, response).map_into_right_body());
                        }
                    }
                }
                // 쿠키만 확인하고, 실패해도 익명으로 진행
                AuthMode::Optional => {
                    let token = cookie_token(&req);
                    if let Some(user) = auth_service.current_user(token.as_deref()).await {
                        log::debug!("선택적 인증 성공: {}", user.email);
                        req.extensions_mut().insert(AuthenticatedUser::new(user));
                    }
                }
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 역할 검증
pub fn authorize(
    user: crate::domain::entities::users::User,
    required_role: Option<&RequiredRole>,
) -> Result<AuthenticatedUser, AppError> {
    let user = AuthenticatedUser::new(user);
    match required_role {
        Some(required) if !required.is_satisfied(user.role()) => {
            Err(AppError::AuthorizationError(PERMISSION_DENIED.to_string()))
        }
        _ => Ok(user),
    }
}

fn cookie_token(req: &ServiceRequest) -> Option<String> {
    req.cookie(JwtConfig::COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// `Authorization: Bearer` 헤더를 우선하고, 없으면 쿠키를 사용합니다.
fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_string)
        .or_else(|| cookie_token(req))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    use crate::domain::entities::users::{Role, User};

    fn user_with_role(role: Role) -> User {
        let mut user = User::new("Jonas".into(), "jonas@example.com".into(), "$2b$hash".into());
        user.role = role;
        user
    }

    #[test]
    fn test_authorize_rejects_missing_role() {
        let required = RequiredRole::Any(vec![Role::Admin, Role::LeadGuide]);

        match authorize(user_with_role(Role::User), Some(&required)) {
            Err(AppError::AuthorizationError(msg)) => assert_eq!(msg, PERMISSION_DENIED),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(authorize(user_with_role(Role::LeadGuide), Some(&required)).is_ok());
        assert!(authorize(user_with_role(Role::User), None).is_ok());
    }

    #[test]
    fn test_authorize_strips_password() {
        let user = authorize(user_with_role(Role::User), None).unwrap();
        assert!(user.user.password.is_none());
    }

    #[test]
    fn test_header_token_takes_precedence_over_cookie() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer header-token"))
            .cookie(Cookie::new(JwtConfig::COOKIE_NAME, "cookie-token"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("header-token"));
    }

    #[test]
    fn test_cookie_token_is_used_without_header() {
        let req = TestRequest::default()
            .cookie(Cookie::new(JwtConfig::COOKIE_NAME, "cookie-token"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("cookie-token"));

        let anonymous = TestRequest::default().to_srv_request();
        assert!(extract_token(&anonymous).is_none());
    }
}
