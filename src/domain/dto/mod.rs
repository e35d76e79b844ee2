//! # Data Transfer Objects
//!
//! 요청 본문 역직렬화 + `validator` 검증, 응답 직렬화를 담당합니다.
//!
//! - [`tours`] - 투어 생성/수정
//! - [`reviews`] - 리뷰 작성/수정
//! - [`users`] - 인증, 본인/관리자 수정, 사용자 응답
//! - [`envelope`] - `{status, data}` 응답 형식

pub mod envelope;
pub mod reviews;
pub mod tours;
pub mod users;
