//! # Configuration Module
//!
//! 환경 변수 기반 설정값을 타입별 구조체로 제공합니다.
//! `.env.dev` / `.env.prod` 파일은 `main`에서 `PROFILE`에 따라 로드됩니다.
//!
//! - [`data_config`] - 실행 환경, 서버, 데이터베이스, 비밀번호 해싱
//! - [`auth_config`] - JWT, 인증 쿠키, 비밀번호 재설정 토큰
//! - [`mail_config`] - SMTP 메일 전송
//!
//! ```bash
//! export PORT="8080"
//! export DATABASE="mongodb+srv://natours:<PASSWORD>@cluster0.mongodb.net"
//! export DATABASE_PASSWORD="secret"
//! export JWT_SECRET="your-super-secret-key"
//! export JWT_COOKIE_EXPIRES_IN="90"
//! export ENVIRONMENT="development"
//! ```

pub mod auth_config;
pub mod data_config;
pub mod mail_config;

pub use auth_config::*;
pub use data_config::*;
pub use mail_config::*;
