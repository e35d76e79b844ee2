//! # 리뷰 요청 DTO

use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;
use validator::Validate;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::reviews::Review;

/// 리뷰 작성 요청
///
/// 중첩 경로(`/tours/{tourId}/reviews`)에서는 `tour`를 생략할 수 있고,
/// `user`는 생략 시 로그인한 사용자로 채워집니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "Review can not be empty"))]
    pub review: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[serde(default)]
    pub tour: Option<String>,

    #[serde(default)]
    pub user: Option<String>,
}

impl CreateReviewRequest {
    /// 본문 값이 없으면 경로의 투어 ID와 로그인 사용자 ID로 채워 엔티티를 만듭니다.
    pub fn into_review(
        self,
        route_tour: Option<ObjectId>,
        current_user: Option<ObjectId>,
    ) -> AppResult<Review> {
        let tour = resolve_reference(self.tour.as_deref(), route_tour, "Review must belong to a tour")?;
        let user = resolve_reference(self.user.as_deref(), current_user, "Review must belong to a user")?;

        Ok(Review::new(self.review.trim().to_string(), self.rating, tour, user))
    }
}

fn resolve_reference(
    explicit: Option<&str>,
    fallback: Option<ObjectId>,
    missing_message: &str,
) -> AppResult<ObjectId> {
    match explicit.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => ObjectId::parse_str(value).map_err(|_| AppError::invalid_id(value)),
        None => fallback.ok_or_else(|| AppError::ValidationError(missing_message.to_string())),
    }
}

/// 리뷰 수정 요청. 투어/작성자는 바꿀 수 없습니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, message = "Review can not be empty"))]
    pub review: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

impl UpdateReviewRequest {
    pub fn to_set_document(&self) -> AppResult<Document> {
        let mut set = doc! {};
        if let Some(review) = &self.review {
            set.insert("review", review.trim());
        }
        if let Some(rating) = self.rating {
            set.insert("rating", rating);
        }

        if set.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tour: Option<&str>) -> CreateReviewRequest {
        CreateReviewRequest {
            review: " Amazing tour! ".into(),
            rating: 5,
            tour: tour.map(str::to_string),
            user: None,
        }
    }

    #[test]
    fn test_route_and_user_ids_fill_missing_references() {
        let tour_id = ObjectId::new();
        let user_id = ObjectId::new();

        let review = request(None).into_review(Some(tour_id), Some(user_id)).unwrap();
        assert_eq!(review.tour, tour_id);
        assert_eq!(review.user, user_id);
        assert_eq!(review.review, "Amazing tour!");
    }

    #[test]
    fn test_explicit_tour_wins_over_route() {
        let explicit = ObjectId::new();
        let review = request(Some(&explicit.to_hex()))
            .into_review(Some(ObjectId::new()), Some(ObjectId::new()))
            .unwrap();
        assert_eq!(review.tour, explicit);
    }

    #[test]
    fn test_missing_tour_is_validation_error() {
        match request(None).into_review(None, Some(ObjectId::new())) {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "Review must belong to a tour"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rating_range_is_validated() {
        let mut req = request(None);
        req.rating = 6;
        assert!(req.validate().is_err());

        let update = UpdateReviewRequest { review: None, rating: Some(0) };
        assert!(update.validate().is_err());
    }
}
