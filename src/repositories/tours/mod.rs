//! 투어 데이터 액세스 계층
//!
//! ```rust,ignore
//! use crate::repositories::tours::TourRepository;
//!
//! let tour_repo = TourRepository::instance();
//! let tour = tour_repo.find_by_slug("the-forest-hiker").await?;
//! ```

pub mod tour_repo;

pub use tour_repo::*;
