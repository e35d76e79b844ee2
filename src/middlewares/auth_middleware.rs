//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 JWT 토큰을 검증하고 사용자 정보를 추출합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::auth::authentication_request::{AuthMode, RequiredRole};
use crate::domain::entities::users::Role;
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    /// 로그인 필수
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 서버 렌더링 페이지용. 쿠키가 유효하면 사용자를 바인딩합니다.
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    pub fn required_with_role(role: Role) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Single(role))
    }

    /// 나열된 역할 중 하나 필요
    pub fn required_with_roles(roles: &[Role]) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Any(roles.to_vec()))
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode,
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let optional = AuthMiddleware::optional();
        assert_eq!(optional.mode, AuthMode::Optional);
        assert!(optional.required_role.is_none());

        let staff = AuthMiddleware::required_with_roles(&[Role::Admin, Role::LeadGuide]);
        assert_eq!(staff.mode, AuthMode::Required);
        match staff.required_role {
            Some(RequiredRole::Any(roles)) => assert_eq!(roles, vec![Role::Admin, Role::LeadGuide]),
            other => panic!("unexpected role requirement: {:?}", other),
        }
    }
}
