//! 미들웨어 모듈
//!
//! # 인증 미들웨어 (AuthMiddleware)
//! - `Authorization: Bearer` 헤더 또는 `jwt-token` 쿠키의 JWT 검증
//! - 활성 사용자 조회, 토큰 발급 이후 비밀번호 변경 여부 확인
//! - 사용자 정보를 request extension에 저장
//! - 역할 검증 (403)
//! - 선택적 모드: 쿠키만 확인하고 실패해도 요청 진행 (서버 렌더링 페이지)
//!
//! ## 특정 스코프/라우트에만 적용
//! ```rust,ignore
//! web::scope("/api/v1/tours")
//!     .route("", web::get().to(get_all_tours))
//!     .service(
//!         web::resource("/{id}")
//!             .route(web::patch().to(update_tour))
//!             .wrap(AuthMiddleware::required_with_roles(&[Role::Admin, Role::LeadGuide])),
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_inner::PERMISSION_DENIED;
pub use auth_middleware::AuthMiddleware;
