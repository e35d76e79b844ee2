//! Tour Entity
//!
//! `tours` 컬렉션 문서와 1:1로 매핑되는 투어 엔티티입니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 리뷰가 없을 때의 기본 평점
pub const DEFAULT_RATINGS_AVERAGE: f64 = 4.5;

/// 투어 난이도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
        }
    }
}

/// GeoJSON Point
///
/// 좌표 순서는 `[경도, 위도]`입니다. `locations`의 항목은 `day`를 함께 가집니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "GeoPoint::point_type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<i32>,
}

impl GeoPoint {
    fn point_type() -> String {
        "Point".to_string()
    }

    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            kind: Self::point_type(),
            coordinates: vec![lng, lat],
            address: None,
            description: None,
            day: None,
        }
    }

    /// GeoJSON 형식 검사: `type`이 `Point`이고 경도/위도 범위 안의 좌표 2개
    pub fn is_valid(&self) -> bool {
        self.kind == "Point"
            && self.coordinates.len() == 2
            && (-180.0..=180.0).contains(&self.coordinates[0])
            && (-90.0..=90.0).contains(&self.coordinates[1])
    }
}

/// 투어 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    pub duration: i32,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    #[serde(default = "default_ratings_average")]
    pub ratings_average: f64,
    #[serde(default)]
    pub ratings_quantity: i32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<f64>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_cover: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime,
    #[serde(default)]
    pub start_dates: Vec<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<GeoPoint>,
    #[serde(default)]
    pub locations: Vec<GeoPoint>,
    #[serde(default)]
    pub guides: Vec<ObjectId>,
}

fn default_ratings_average() -> f64 {
    DEFAULT_RATINGS_AVERAGE
}

/// 평점 평균은 소수점 한 자리로 저장합니다. (4.666 → 4.7)
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl Tour {
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 할인 적용가
    pub fn effective_price(&self) -> f64 {
        self.price - self.price_discount.unwrap_or(0.0)
    }

    /// 기간(일)을 주 단위로 환산한 값
    pub fn duration_weeks(&self) -> f64 {
        f64::from(self.duration) / 7.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(4.666_666), 4.7);
        assert_eq!(round_rating(4.0), 4.0);
        assert_eq!(round_rating(3.04), 3.0);
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(-80.185942, 25.774772).is_valid());
        assert!(!GeoPoint::new(200.0, 25.0).is_valid());

        let mut broken = GeoPoint::new(1.0, 1.0);
        broken.coordinates.pop();
        assert!(!broken.is_valid());
    }

    #[test]
    fn test_tour_deserializes_with_defaults() {
        let json = serde_json::json!({
            "name": "The Forest Hiker",
            "slug": "the-forest-hiker",
            "duration": 5,
            "maxGroupSize": 25,
            "difficulty": "easy",
            "price": 397.0,
            "summary": "Breathtaking hike through the Canadian Banff National Park",
            "imageCover": "tour-1-cover.jpg",
            "createdAt": serde_json::to_value(DateTime::from_millis(1_700_000_000_000)).unwrap()
        });

        let tour: Tour = serde_json::from_value(json).unwrap();
        assert_eq!(tour.difficulty, Difficulty::Easy);
        assert_eq!(tour.ratings_average, DEFAULT_RATINGS_AVERAGE);
        assert_eq!(tour.ratings_quantity, 0);
        assert!(tour.guides.is_empty());
        assert!((tour.duration_weeks() - 5.0 / 7.0).abs() < f64::EPSILON);
        assert_eq!(tour.effective_price(), 397.0);
    }
}
