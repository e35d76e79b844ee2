//! 투어 예약 백엔드
//!
//! 투어, 사용자, 리뷰에 대한 REST API와 서버 렌더링 페이지를 제공합니다.
//! 모든 리소스는 범용 쿼리 빌더와 핸들러 팩토리를 공유합니다.
//!
//! # Features
//!
//! - **범용 CRUD**: 필터(`price[gte]=500`), 정렬, 필드 선택, 페이지네이션
//! - **JWT 인증**: Bearer 헤더 또는 `jwt-token` 쿠키, 역할 기반 접근 제어
//! - **비밀번호 재설정**: SHA-256 해시로 저장되는 일회용 토큰과 메일 발송
//! - **리포트**: 난이도별 통계, 월별 출발 계획, 반경/거리 지리 조회
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//! - **MongoDB**: 영구 저장
//! - **Redis**: 인증 경로의 사용자 캐싱
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API + 페이지
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← factory + 리소스별 핸들러
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 인증, 집계, 메일
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← CrudRepository, QueryBuilder
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
