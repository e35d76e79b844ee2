//! # 인증 서비스 모듈
//!
//! - [`token_service`] - JWT 발급/검증
//! - [`reset_token`] - 비밀번호 재설정 토큰 생성과 해시
//! - [`auth_service`] - 가입, 로그인, 비밀번호 재설정/변경, 요청 인증

pub mod auth_service;
pub mod reset_token;
pub mod token_service;

pub use auth_service::*;
pub use token_service::*;
