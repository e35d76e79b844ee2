//! # 투어 생성/수정 요청 DTO

use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{self, oid::ObjectId, Bson, DateTime, Document};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::tours::{Difficulty, GeoPoint, Tour, DEFAULT_RATINGS_AVERAGE};
use crate::utils::string_utils::{deserialize_optional_string, deserialize_trimmed_string, slugify};

const NAME_LENGTH_MESSAGE: &str = "A tour name must have between 10 and 40 characters";
const DISCOUNT_MESSAGE: &str = "Discount price should be below regular price";
const LOCATION_MESSAGE: &str = "Locations must be GeoJSON points with [lng, lat] coordinates";

fn parse_object_ids(ids: &[String]) -> AppResult<Vec<ObjectId>> {
    ids.iter()
        .map(|id| ObjectId::parse_str(id).map_err(|_| AppError::invalid_id(id)))
        .collect()
}

fn to_bson_dates(dates: &[ChronoDateTime<Utc>]) -> Vec<DateTime> {
    dates
        .iter()
        .map(|date| DateTime::from_millis(date.timestamp_millis()))
        .collect()
}

fn check_discount(price: Option<f64>, discount: Option<f64>) -> Result<(), ValidationError> {
    match (price, discount) {
        (Some(price), Some(discount)) if discount >= price => {
            Err(ValidationError::new("price_discount").with_message(DISCOUNT_MESSAGE.into()))
        }
        _ => Ok(()),
    }
}

fn check_locations<'a>(
    points: impl IntoIterator<Item = &'a GeoPoint>,
) -> Result<(), ValidationError> {
    if points.into_iter().all(GeoPoint::is_valid) {
        Ok(())
    } else {
        Err(ValidationError::new("geo_point").with_message(LOCATION_MESSAGE.into()))
    }
}

/// 투어 생성 요청 (`POST /api/v1/tours`)
///
/// `ratingsAverage`/`ratingsQuantity`는 리뷰 집계로만 갱신되므로 받지 않습니다.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_tour"))]
pub struct CreateTourRequest {
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(min = 10, max = 40, message = "A tour name must have between 10 and 40 characters"))]
    pub name: String,

    #[validate(range(min = 1, message = "A tour must have a duration"))]
    pub duration: i32,

    #[validate(range(min = 1, message = "A tour must have a group size"))]
    pub max_group_size: i32,

    pub difficulty: Difficulty,

    #[validate(range(exclusive_min = 0.0, message = "A tour must have a price"))]
    pub price: f64,

    pub price_discount: Option<f64>,

    #[serde(deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(min = 1, message = "A tour must have a summary"))]
    pub summary: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "A tour must have a cover image"))]
    pub image_cover: String,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub start_dates: Vec<ChronoDateTime<Utc>>,

    #[serde(default)]
    pub start_location: Option<GeoPoint>,

    #[serde(default)]
    pub locations: Vec<GeoPoint>,

    /// 가이드 사용자 ID (hex)
    #[serde(default)]
    pub guides: Vec<String>,
}

fn validate_create_tour(req: &CreateTourRequest) -> Result<(), ValidationError> {
    check_discount(Some(req.price), req.price_discount)?;
    check_locations(req.start_location.iter().chain(req.locations.iter()))
}

impl CreateTourRequest {
    /// 검증된 요청을 저장 가능한 엔티티로 변환합니다. 슬러그는 이름에서 파생됩니다.
    pub fn into_tour(self) -> AppResult<Tour> {
        let guides = parse_object_ids(&self.guides)?;

        Ok(Tour {
            id: None,
            slug: slugify(&self.name),
            name: self.name,
            duration: self.duration,
            max_group_size: self.max_group_size,
            difficulty: self.difficulty,
            ratings_average: DEFAULT_RATINGS_AVERAGE,
            ratings_quantity: 0,
            price: self.price,
            price_discount: self.price_discount,
            summary: self.summary,
            description: self.description,
            image_cover: self.image_cover,
            images: self.images,
            created_at: DateTime::now(),
            start_dates: to_bson_dates(&self.start_dates),
            start_location: self.start_location,
            locations: self.locations,
            guides,
        })
    }
}

/// 투어 부분 수정 요청 (`PATCH /api/v1/tours/{id}`)
///
/// 전달된 필드만 `$set`으로 반영되며, 생성 시와 같은 검증 규칙이 다시 적용됩니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_tour"))]
pub struct UpdateTourRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 10, max = 40, message = "A tour name must have between 10 and 40 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 1, message = "A tour must have a duration"))]
    pub duration: Option<i32>,

    #[validate(range(min = 1, message = "A tour must have a group size"))]
    pub max_group_size: Option<i32>,

    pub difficulty: Option<Difficulty>,

    #[validate(range(exclusive_min = 0.0, message = "A tour must have a price"))]
    pub price: Option<f64>,

    pub price_discount: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub summary: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image_cover: Option<String>,

    pub images: Option<Vec<String>>,

    pub start_dates: Option<Vec<ChronoDateTime<Utc>>>,

    pub start_location: Option<GeoPoint>,

    pub locations: Option<Vec<GeoPoint>>,

    pub guides: Option<Vec<String>>,
}

fn validate_update_tour(req: &UpdateTourRequest) -> Result<(), ValidationError> {
    check_discount(req.price, req.price_discount)?;
    check_locations(
        req.start_location
            .iter()
            .chain(req.locations.iter().flatten()),
    )
}

impl UpdateTourRequest {
    /// 전달된 필드만 담은 `$set` 문서. 이름이 바뀌면 슬러그도 함께 갱신합니다.
    pub fn to_set_document(&self) -> AppResult<Document> {
        let mut set = Document::new();

        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
            set.insert("slug", slugify(name));
        }
        if let Some(duration) = self.duration {
            set.insert("duration", duration);
        }
        if let Some(size) = self.max_group_size {
            set.insert("maxGroupSize", size);
        }
        if let Some(difficulty) = self.difficulty {
            set.insert("difficulty", difficulty.as_str());
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        if let Some(discount) = self.price_discount {
            set.insert("priceDiscount", discount);
        }
        if let Some(summary) = &self.summary {
            set.insert("summary", summary.as_str());
        }
        if let Some(description) = &self.description {
            set.insert("description", description.as_str());
        }
        if let Some(cover) = &self.image_cover {
            set.insert("imageCover", cover.as_str());
        }
        if let Some(images) = &self.images {
            set.insert("images", images.clone());
        }
        if let Some(dates) = &self.start_dates {
            set.insert("startDates", to_bson_dates(dates));
        }
        if let Some(location) = &self.start_location {
            set.insert("startLocation", bson::to_bson(location)?);
        }
        if let Some(locations) = &self.locations {
            set.insert("locations", bson::to_bson(locations)?);
        }
        if let Some(guides) = &self.guides {
            let ids: Vec<Bson> = parse_object_ids(guides)?.into_iter().map(Bson::ObjectId).collect();
            set.insert("guides", ids);
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
    use serde_json::json;

    fn create_payload() -> serde_json::Value {
        json!({
            "name": "The Forest Hiker",
            "duration": 5,
            "maxGroupSize": 25,
            "difficulty": "easy",
            "price": 397,
            "summary": "Breathtaking hike through the Canadian Banff National Park",
            "imageCover": "tour-1-cover.jpg",
            "startDates": ["2025-04-25T09:00:00Z", "2025-07-20T09:00:00Z"],
            "startLocation": {
                "type": "Point",
                "coordinates": [-116.214531, 51.417611],
                "address": "Banff, CAN"
            }
        })
    }

    #[test]
    fn test_create_request_into_tour() {
        let req: CreateTourRequest = serde_json::from_value(create_payload()).unwrap();
        assert!(req.validate().is_ok());

        let tour = req.into_tour().unwrap();
        assert_eq!(tour.slug, "the-forest-hiker");
        assert_eq!(tour.ratings_average, DEFAULT_RATINGS_AVERAGE);
        assert_eq!(tour.start_dates.len(), 2);
    }

    #[test]
    fn test_create_request_rejects_discount_above_price() {
        let mut payload = create_payload();
        payload["priceDiscount"] = json!(500);
        let req: CreateTourRequest = serde_json::from_value(payload).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.to_string().contains(DISCOUNT_MESSAGE));
    }

    #[test]
    fn test_create_request_rejects_short_name() {
        let mut payload = create_payload();
        payload["name"] = json!("Short");
        let req: CreateTourRequest = serde_json::from_value(payload).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.to_string().contains(NAME_LENGTH_MESSAGE));
    }

    #[test]
    fn test_create_request_rejects_invalid_guide_id() {
        let mut payload = create_payload();
        payload["guides"] = json!(["not-an-id"]);
        let req: CreateTourRequest = serde_json::from_value(payload).unwrap();

        match req.into_tour() {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "Invalid _id: not-an-id"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_difficulty_fails_to_parse() {
        let mut payload = create_payload();
        payload["difficulty"] = json!("extreme");
        assert!(serde_json::from_value::<CreateTourRequest>(payload).is_err());
    }

    #[test]
    fn test_update_request_set_document() {
        let req: UpdateTourRequest = serde_json::from_value(json!({
            "name": "The Sea Explorer Deluxe",
            "price": 599,
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let set = req.to_set_document().unwrap();
        assert_eq!(set.get_str("slug").unwrap(), "the-sea-explorer-deluxe");
        assert_eq!(set.get_f64("price").unwrap(), 599.0);
        assert!(!set.contains_key("duration"));
    }

    #[test]
    fn test_update_request_revalidates() {
        let req: UpdateTourRequest =
            serde_json::from_value(json!({ "price": 100, "priceDiscount": 150 })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_ratings_are_not_client_writable() {
        let mut payload = create_payload();
        payload["ratingsAverage"] = json!(2.0);
        payload["ratingsQuantity"] = json!(40);
        let tour = serde_json::from_value::<CreateTourRequest>(payload)
            .unwrap()
            .into_tour()
            .unwrap();
        assert_eq!(tour.ratings_average, DEFAULT_RATINGS_AVERAGE);
        assert_eq!(tour.ratings_quantity, 0);

        let req: UpdateTourRequest = serde_json::from_value(json!({
            "ratingsAverage": 1.2,
            "ratingsQuantity": 3,
            "price": 450,
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let set = req.to_set_document().unwrap();
        assert!(!set.contains_key("ratingsAverage"));
        assert!(!set.contains_key("ratingsQuantity"));
        assert_eq!(set.get_f64("price").unwrap(), 450.0);

        let only_rating: UpdateTourRequest =
            serde_json::from_value(json!({ "ratingsAverage": 1.2 })).unwrap();
        assert!(only_rating.to_set_document().is_err());
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert!(UpdateTourRequest::default().to_set_document().is_err());
    }
}
