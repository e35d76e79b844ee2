//! # Domain Models
//!
//! 영속되지 않는 도메인 값 객체입니다.
//!
//! - [`auth`] - 요청에 바인딩되는 인증 사용자, 인증 모드와 역할 요구사항
//! - [`token`] - JWT 클레임

pub mod auth;
pub mod token;
