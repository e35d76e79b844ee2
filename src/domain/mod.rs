//! # Domain Layer Module
//!
//! 투어 예약 도메인의 엔티티, 요청/응답 DTO, 값 객체를 정의합니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities   - MongoDB 문서와 매핑되는 Tour / User / Review
//! ├── dto        - 요청 본문 검증, 응답 직렬화, `{status, data}` envelope
//! └── models     - 인증 사용자, 역할 요구사항, JWT 클레임
//!      │
//!      ▼
//! Application Layer (Services, Handlers)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, DB, Redis)
//! ```
//!
//! ## 엔티티 관계
//!
//! ```text
//! Tour ──< guides >── User
//!  │                   │
//!  └──────< Review >───┘
//! ```
//!
//! - `Tour.guides`는 `User` ObjectId 배열입니다.
//! - `Review`는 `tour`, `user`를 ObjectId로 참조하며 `(tour, user)`는 유니크합니다.
//! - 리뷰가 생성/수정/삭제되면 해당 투어의 `ratingsQuantity`, `ratingsAverage`가 다시 계산됩니다.
//!
//! ## 검증 흐름
//!
//! ```rust,ignore
//! let request: CreateTourRequest = body.into_inner();
//! request.validate()?;              // validator → AppError::ValidationError
//! let tour = request.into_tour()?;  // 슬러그 생성, guides ObjectId 변환
//! ```

pub mod dto;
pub mod entities;
pub mod models;

pub use dto::*;
pub use entities::*;
pub use models::*;
