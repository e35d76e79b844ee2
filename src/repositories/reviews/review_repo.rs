//! # 리뷰 리포지토리
//!
//! 리뷰가 생성/수정/삭제될 때마다 해당 투어의 평점 수와 평균을 다시 집계합니다.
//!
//! ```text
//! reviews ──$match { tour }──$group { nRating, avgRating }──▶ tours.ratingsQuantity / ratingsAverage
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, Document},
    options::IndexOptions,
    IndexModel,
};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    core::errors::AppResult,
    core::registry::Repository,
    db::Database,
    domain::dto::reviews::{CreateReviewRequest, UpdateReviewRequest},
    domain::entities::reviews::RatingsSummary,
    repositories::crud::{CrudRepository, ParentRef, WriteContext},
    repositories::populate::{public_user, Populate},
    repositories::tours::TourRepository,
};

#[repository(name = "review", collection = "reviews")]
pub struct ReviewRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
    tour_repo: Arc<TourRepository>,
}

/// `$group` 결과의 숫자 필드 (`$sum`은 Int32, 큰 값은 Int64로 반환됨)
fn numeric(document: &Document, key: &str) -> Option<f64> {
    match document.get(key)? {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// 집계 문서를 (리뷰 수, 평균 평점)으로 변환
pub fn parse_rating_stats(document: Option<&Document>) -> Option<(i64, f64)> {
    let document = document?;
    let count = numeric(document, "nRating")? as i64;
    let average = numeric(document, "avgRating")?;
    Some((count, average))
}

pub fn rating_stats_pipeline(tour_id: ObjectId) -> Vec<Document> {
    vec![
        doc! { "$match": { "tour": tour_id } },
        doc! { "$group": {
            "_id": "$tour",
            "nRating": { "$sum": 1 },
            "avgRating": { "$avg": "$rating" },
        } },
    ]
}

impl ReviewRepository {
    /// 투어의 리뷰 평점을 집계해 투어 문서에 반영합니다.
    pub async fn calc_average_ratings(&self, tour_id: ObjectId) -> AppResult<RatingsSummary> {
        let stats: Vec<Document> = self
            .documents()
            .aggregate(rating_stats_pipeline(tour_id))
            .await?
            .try_collect()
            .await?;

        let summary = RatingsSummary::from_aggregate(parse_rating_stats(stats.first()));
        self.tour_repo.update_ratings(tour_id, summary).await?;
        Ok(summary)
    }

    /// 인덱스 생성
    ///
    /// - `(tour, user)` 유니크: 사용자당 투어 리뷰 1개
    pub async fn create_indexes(&self) -> AppResult<()> {
        let unique_review = IndexModel::builder()
            .keys(doc! { "tour": 1, "user": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("tour_user_unique".to_string())
                    .build(),
            )
            .build();

        self.documents().create_index(unique_review).await?;
        Ok(())
    }
}

#[async_trait]
impl CrudRepository for ReviewRepository {
    type Create = CreateReviewRequest;
    type Update = UpdateReviewRequest;

    const MODEL: &'static str = "review";
    const PARENT: Option<ParentRef> = Some(ParentRef {
        param: "tourId",
        field: "tour",
    });

    fn handle() -> Arc<Self> {
        Self::instance()
    }

    fn documents(&self) -> mongodb::Collection<Document> {
        self.collection::<Document>()
    }

    fn list_populates(&self) -> Vec<Populate> {
        vec![public_user("user").select(&["name", "photo"])]
    }

    fn new_document(&self, input: CreateReviewRequest, ctx: &WriteContext<'_>) -> AppResult<Document> {
        let current_user = ctx.current_user.and_then(|user| user.id);
        let review = input.into_review(ctx.parent_id, current_user)?;
        Ok(bson::to_document(&review)?)
    }

    fn update_document(&self, input: &UpdateReviewRequest) -> AppResult<Document> {
        input.to_set_document()
    }

    async fn after_write(&self, document: &Document) -> AppResult<()> {
        if let Ok(tour_id) = document.get_object_id("tour") {
            self.calc_average_ratings(tour_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating_stats() {
        let stats = doc! { "_id": ObjectId::new(), "nRating": 3, "avgRating": 4.666 };
        assert_eq!(parse_rating_stats(Some(&stats)), Some((3, 4.666)));
        assert_eq!(parse_rating_stats(None), None);

        let summary = RatingsSummary::from_aggregate(parse_rating_stats(Some(&stats)));
        assert_eq!(summary.quantity, 3);
        assert_eq!(summary.average, 4.7);
    }

    #[test]
    fn test_no_reviews_resets_to_default() {
        let summary = RatingsSummary::from_aggregate(parse_rating_stats(None));
        assert_eq!(summary.quantity, 0);
        assert_eq!(summary.average, 4.5);
    }

    #[test]
    fn test_rating_stats_pipeline_matches_tour() {
        let tour = ObjectId::new();
        let pipeline = rating_stats_pipeline(tour);
        assert_eq!(
            pipeline[0].get_document("$match").unwrap().get_object_id("tour").unwrap(),
            tour
        );
        let group = pipeline[1].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$tour");
    }

    #[test]
    fn test_reviews_are_nested_under_tours() {
        let parent = <ReviewRepository as CrudRepository>::PARENT.unwrap();
        assert_eq!(parent.param, "tourId");
        assert_eq!(parent.field, "tour");
    }
}
