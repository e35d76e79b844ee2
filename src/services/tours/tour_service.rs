//! # 투어 통계/지리 서비스
//!
//! 범용 CRUD 외에 투어에만 있는 집계 조회를 담당합니다.

use std::sync::Arc;

use mongodb::bson::{doc, Document};
use singleton_macro::service;

use crate::{
    core::errors::AppResult,
    repositories::crud::CrudRepository,
    repositories::tours::TourRepository,
    services::tours::geo::{distances_pipeline, within_filter, DistanceUnit, LatLng},
    services::tours::reports::{monthly_plan_pipeline, tour_stats_pipeline},
};

#[service(name = "tour")]
pub struct TourService {
    tour_repo: Arc<TourRepository>,
}

impl TourService {
    pub async fn stats(&self) -> AppResult<Vec<Document>> {
        self.tour_repo.aggregate(tour_stats_pipeline()).await
    }

    pub async fn monthly_plan(&self, year: i32) -> AppResult<Vec<Document>> {
        self.tour_repo.aggregate(monthly_plan_pipeline(year)?).await
    }

    /// 반경 안에 출발지가 있는 투어 (가이드 포함)
    pub async fn tours_within(
        &self,
        distance: f64,
        center: LatLng,
        unit: DistanceUnit,
    ) -> AppResult<Vec<Document>> {
        let mut pipeline = vec![doc! { "$match": within_filter(distance, center, unit) }];
        for populate in self.tour_repo.list_populates() {
            pipeline.extend(populate.stages());
        }
        pipeline.push(doc! { "$project": self.tour_repo.hidden_projection() });

        self.tour_repo.aggregate(pipeline).await
    }

    pub async fn distances(&self, center: LatLng, unit: DistanceUnit) -> AppResult<Vec<Document>> {
        self.tour_repo.aggregate(distances_pipeline(center, unit)).await
    }
}
