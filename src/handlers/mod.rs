//! # HTTP Request Handlers Module
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 인증, 집계, 메일                      ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 범용 CRUD, 쿼리 빌더              ← Repository Layer
//! ├─────────────────────────────────────────────┤
//!   Entities/Models - 도메인 모델                  ← Domain Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 모듈 구성
//!
//! - **`factory`**: 모든 리소스가 공유하는 목록/단건/생성/수정/삭제 본문
//! - **`tours`**: 투어 CRUD, 별칭, 통계, 지리 조회
//! - **`reviews`**: 리뷰 CRUD (독립 경로와 투어 중첩 경로)
//! - **`users`**: 본인 계정 관리, 관리자용 사용자 CRUD
//! - **`auth`**: 회원가입, 로그인/로그아웃, 비밀번호 재설정/변경
//! - **`views`**: 서버 렌더링 페이지
//!
//! 모든 핸들러는 `Result<HttpResponse, AppError>`를 반환하고, 에러 응답은
//! `AppError`의 `ResponseError` 구현이 한 곳에서 만듭니다.

pub mod auth;
pub mod factory;
pub mod reviews;
pub mod tours;
pub mod users;
pub mod views;
