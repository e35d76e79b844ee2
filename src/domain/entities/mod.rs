//! # Domain Entities Module
//!
//! MongoDB 컬렉션과 1:1로 대응되는 문서 구조체입니다.
//!
//! ```text
//! tours   ←── reviews.tour
//!   │
//!   └── guides ──→ users ←── reviews.user
//! ```
//!
//! - 필드 이름은 camelCase로 저장됩니다. (`ratingsAverage`, `passwordChangedAt`)
//! - `_id`는 `Option<ObjectId>`로, 삽입 전에는 비어 있습니다.

pub mod reviews;
pub mod tours;
pub mod users;
