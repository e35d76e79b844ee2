//! # Repository Layer
//!
//! MongoDB 컬렉션별 데이터 액세스 계층입니다. 각 리포지토리는
//! `#[repository]` 매크로로 싱글톤 등록되고, 공통 CRUD는 [`crud::CrudRepository`]
//! 트레이트의 기본 구현을 사용합니다.
//!
//! - [`query_builder`] - URL 쿼리 → 필터/정렬/프로젝션/페이지네이션
//! - [`populate`] - ObjectId 참조를 `$lookup`으로 채우기
//! - [`tours`], [`users`], [`reviews`] - 컬렉션별 리포지토리

pub mod crud;
pub mod populate;
pub mod query_builder;
pub mod reviews;
pub mod tours;
pub mod users;

pub use crud::*;
pub use query_builder::{ListQuery, QueryBuilder, QueryString};
