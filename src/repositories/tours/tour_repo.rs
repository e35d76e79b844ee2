//! # 투어 리포지토리
//!
//! `tours` 컬렉션에 대한 범용 CRUD와 함께 슬러그 조회, 평점 집계 반영,
//! 통계/지리 집계 파이프라인 실행을 담당합니다.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::IndexOptions,
    IndexModel,
};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    core::errors::AppResult,
    core::registry::Repository,
    db::Database,
    domain::dto::tours::{CreateTourRequest, UpdateTourRequest},
    domain::entities::reviews::RatingsSummary,
    domain::entities::tours::Tour,
    repositories::crud::{CrudRepository, WriteContext},
    repositories::populate::{public_user, Populate},
};

/// 참조된 사용자 문서에서 항상 숨기는 필드
pub const USER_PRIVATE_FIELDS: [&str; 6] = [
    "__v",
    "password",
    "passwordChangedAt",
    "passwordResetToken",
    "passwordResetExpires",
    "active",
];

/// 투어 데이터 액세스 리포지토리
///
/// 목록/단건 조회 시 `guides`를 사용자 문서로 채우고,
/// 단건 조회에서는 `reviews` 가상 필드(리뷰 + 작성자)를 추가합니다.
#[repository(name = "tour", collection = "tours")]
pub struct TourRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl TourRepository {
    fn guides_populate() -> Populate {
        Populate::many("guides", "users")
            .filter(doc! { "active": { "$ne": false } })
            .exclude(&USER_PRIVATE_FIELDS)
    }

    fn reviews_populate() -> Populate {
        Populate::reverse("reviews", "reviews", "tour")
            .with(public_user("user").select(&["name", "photo"]))
            .exclude(&["__v"])
    }

    /// 상세 페이지용 슬러그 조회 (가이드, 리뷰 포함)
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Document>> {
        let mut pipeline = vec![doc! { "$match": { "slug": slug } }];
        for populate in self.detail_populates() {
            pipeline.extend(populate.stages());
        }

        let mut cursor = self.documents().aggregate(pipeline).await?;
        Ok(cursor.try_next().await?)
    }

    /// 개요 페이지용 전체 목록
    pub async fn find_all(&self) -> AppResult<Vec<Tour>> {
        let cursor = self
            .collection::<Tour>()
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// 리뷰 집계 결과를 투어에 반영합니다.
    pub async fn update_ratings(&self, tour_id: ObjectId, summary: RatingsSummary) -> AppResult<()> {
        self.documents()
            .update_one(
                doc! { "_id": tour_id },
                doc! { "$set": {
                    "ratingsQuantity": summary.quantity,
                    "ratingsAverage": summary.average,
                } },
            )
            .await?;

        log::debug!(
            "투어 평점 갱신: {} ({}개, 평균 {})",
            tour_id,
            summary.quantity,
            summary.average
        );
        Ok(())
    }

    /// 통계/지리 쿼리용 집계 파이프라인 실행
    pub async fn aggregate(&self, pipeline: Vec<Document>) -> AppResult<Vec<Document>> {
        let cursor = self.documents().aggregate(pipeline).await?;
        Ok(cursor.try_collect().await?)
    }

    /// 인덱스 생성
    ///
    /// - `price` 오름차순 + `ratingsAverage` 내림차순 복합 인덱스
    /// - `name`, `slug` 유니크 인덱스 (중복 이름은 409에 이름 값이 표시됨)
    /// - `startLocation` 2dsphere 인덱스 (`$geoWithin`, `$geoNear`에 필요)
    pub async fn create_indexes(&self) -> AppResult<()> {
        self.documents().create_indexes(Self::index_models()).await?;
        Ok(())
    }

    fn index_models() -> Vec<IndexModel> {
        let price_index = IndexModel::builder()
            .keys(doc! { "price": 1, "ratingsAverage": -1 })
            .options(IndexOptions::builder().name("price_ratings".to_string()).build())
            .build();

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("name_unique".to_string())
                    .build(),
            )
            .build();

        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique".to_string())
                    .build(),
            )
            .build();

        let geo_index = IndexModel::builder()
            .keys(doc! { "startLocation": "2dsphere" })
            .options(IndexOptions::builder().name("start_location_geo".to_string()).build())
            .build();

        vec![price_index, name_index, slug_index, geo_index]
    }
}

#[async_trait]
impl CrudRepository for TourRepository {
    type Create = CreateTourRequest;
    type Update = UpdateTourRequest;

    const MODEL: &'static str = "tour";

    fn handle() -> Arc<Self> {
        Self::instance()
    }

    fn documents(&self) -> mongodb::Collection<Document> {
        self.collection::<Document>()
    }

    fn list_populates(&self) -> Vec<Populate> {
        vec![Self::guides_populate()]
    }

    fn detail_populates(&self) -> Vec<Populate> {
        vec![Self::guides_populate(), Self::reviews_populate()]
    }

    fn new_document(&self, input: CreateTourRequest, _ctx: &WriteContext<'_>) -> AppResult<Document> {
        Ok(bson::to_document(&input.into_tour()?)?)
    }

    fn update_document(&self, input: &UpdateTourRequest) -> AppResult<Document> {
        input.to_set_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guides_populate_hides_private_fields() {
        let stages = TourRepository::guides_populate().stages();
        assert_eq!(stages.len(), 1);

        let lookup = stages[0].get_document("$lookup").unwrap();
        let pipeline = lookup.get_array("pipeline").unwrap();
        let project = pipeline[1].as_document().unwrap().get_document("$project").unwrap();
        assert_eq!(project.get_i32("password").unwrap(), 0);
        assert_eq!(project.get_i32("passwordChangedAt").unwrap(), 0);
    }

    #[test]
    fn test_name_and_slug_are_unique_indexes() {
        let unique: Vec<Document> = TourRepository::index_models()
            .into_iter()
            .filter(|index| index.options.as_ref().and_then(|o| o.unique) == Some(true))
            .map(|index| index.keys)
            .collect();

        assert!(unique.contains(&doc! { "name": 1 }));
        assert!(unique.contains(&doc! { "slug": 1 }));
    }

    #[test]
    fn test_reviews_populate_is_reverse_lookup() {
        let populate = TourRepository::reviews_populate();
        assert_eq!(populate.local_field, "_id");
        assert_eq!(populate.foreign_field, "tour");
        assert_eq!(populate.nested.len(), 1);
    }
}
