//! Review Entity
//!
//! 투어(`tour`)와 작성자(`user`)를 참조하는 리뷰 문서입니다.
//! `(tour, user)` 쌍은 유니크 인덱스로 한 번만 허용됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::domain::entities::tours::{round_rating, DEFAULT_RATINGS_AVERAGE};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub review: String,
    pub rating: i32,
    pub created_at: DateTime,
    pub tour: ObjectId,
    pub user: ObjectId,
}

impl Review {
    pub fn new(review: String, rating: i32, tour: ObjectId, user: ObjectId) -> Self {
        Self {
            id: None,
            review,
            rating,
            created_at: DateTime::now(),
            tour,
            user,
        }
    }
}

/// 투어에 저장되는 평점 집계 (`ratingsQuantity`, `ratingsAverage`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingsSummary {
    pub quantity: i32,
    pub average: f64,
}

impl RatingsSummary {
    /// `$group` 결과(`nRating`, `avgRating`)에서 집계값을 만듭니다.
    ///
    /// 리뷰가 하나도 없으면 `0` / `4.5`로 초기화됩니다.
    pub fn from_aggregate(aggregate: Option<(i64, f64)>) -> Self {
        match aggregate {
            Some((count, average)) if count > 0 => Self {
                quantity: i32::try_from(count).unwrap_or(i32::MAX),
                average: round_rating(average),
            },
            _ => Self {
                quantity: 0,
                average: DEFAULT_RATINGS_AVERAGE,
            },
        }
    }

    /// 리뷰 평점 목록에서 직접 계산합니다.
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::from_aggregate(None);
        }
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        let count = ratings.len() as i64;
        Self::from_aggregate(Some((count, sum as f64 / count as f64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_matches_recomputed_ratings() {
        let summary = RatingsSummary::from_ratings(&[5, 4, 5]);
        assert_eq!(summary.quantity, 3);
        assert_eq!(summary.average, 4.7);

        let aggregated = RatingsSummary::from_aggregate(Some((3, 14.0 / 3.0)));
        assert_eq!(summary, aggregated);
    }

    #[test]
    fn test_summary_resets_without_reviews() {
        let summary = RatingsSummary::from_ratings(&[]);
        assert_eq!(summary.quantity, 0);
        assert_eq!(summary.average, DEFAULT_RATINGS_AVERAGE);
        assert_eq!(RatingsSummary::from_aggregate(Some((0, 0.0))), summary);
    }
}
