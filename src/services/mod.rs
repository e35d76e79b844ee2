//! # Service Layer
//!
//! `#[service]` 매크로로 등록되는 비즈니스 로직 계층입니다.
//! 리포지토리는 `Arc<T>` 필드로 자동 주입됩니다.
//!
//! - [`auth`] - JWT, 가입/로그인, 비밀번호 재설정
//! - [`users`] - 본인 계정 수정/비활성화
//! - [`tours`] - 통계 집계, 지리 쿼리
//! - [`email`] - SMTP 메일 전송

pub mod auth;
pub mod email;
pub mod tours;
pub mod users;
