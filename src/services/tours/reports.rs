//! 투어 통계 집계 파이프라인

use chrono::{TimeZone, Utc};
use mongodb::bson::{doc, DateTime, Document};

use crate::core::errors::{AppError, AppResult};
use crate::repositories::query_builder::QueryString;

/// `GET /tours/top-5-cheap` 별칭: 평점 높고 저렴한 투어 5개
pub fn apply_top_cheap_alias(query: &mut QueryString) {
    query.set("limit", "5");
    query.set("sort", "-ratingsAverage,price");
    query.set("fields", "name,price,ratingsAverage,summary,difficulty");
}

/// 난이도별 통계 (평점 4.5 이상)
pub fn tour_stats_pipeline() -> Vec<Document> {
    vec![
        doc! { "$match": { "ratingsAverage": { "$gte": 4.5 } } },
        doc! { "$group": {
            "_id": { "$toUpper": "$difficulty" },
            "numTours": { "$sum": 1 },
            "numRatings": { "$sum": "$ratingsQuantity" },
            "avgRating": { "$avg": "$ratingsAverage" },
            "avgPrice": { "$avg": "$price" },
            "minPrice": { "$min": "$price" },
            "maxPrice": { "$max": "$price" },
        } },
        doc! { "$sort": { "avgPrice": 1 } },
    ]
}

pub fn parse_year(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (1970..=9999).contains(year))
        .ok_or_else(|| AppError::ValidationError(format!("Invalid year: {}", raw)))
}

fn year_start(year: i32) -> AppResult<DateTime> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .map(|date| DateTime::from_millis(date.timestamp_millis()))
        .ok_or_else(|| AppError::ValidationError(format!("Invalid year: {}", year)))
}

/// 해당 연도의 월별 출발 투어 수와 투어 이름
pub fn monthly_plan_pipeline(year: i32) -> AppResult<Vec<Document>> {
    let start = year_start(year)?;
    let end = year_start(year + 1)?;

    Ok(vec![
        doc! { "$unwind": "$startDates" },
        doc! { "$match": { "startDates": { "$gte": start, "$lt": end } } },
        doc! { "$group": {
            "_id": { "$month": "$startDates" },
            "numTourStarts": { "$sum": 1 },
            "tours": { "$push": "$name" },
        } },
        doc! { "$addFields": { "month": "$_id" } },
        doc! { "$project": { "_id": 0 } },
        doc! { "$sort": { "numTourStarts": -1, "month": 1 } },
        doc! { "$limit": 12 },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_cheap_alias_overrides_query() {
        let mut query = QueryString::parse("limit=50&difficulty=easy");
        apply_top_cheap_alias(&mut query);

        assert_eq!(query.get("limit"), Some("5"));
        assert_eq!(query.get("sort"), Some("-ratingsAverage,price"));
        assert_eq!(query.get("difficulty"), Some("easy"));
    }

    #[test]
    fn test_stats_groups_by_upper_difficulty() {
        let pipeline = tour_stats_pipeline();
        let group = pipeline[1].get_document("$group").unwrap();
        assert_eq!(
            group.get_document("_id").unwrap(),
            &doc! { "$toUpper": "$difficulty" }
        );
        assert_eq!(pipeline[2], doc! { "$sort": { "avgPrice": 1 } });
    }

    #[test]
    fn test_monthly_plan_bounds_year() {
        let pipeline = monthly_plan_pipeline(2021).unwrap();
        let range = pipeline[1]
            .get_document("$match")
            .unwrap()
            .get_document("startDates")
            .unwrap();

        let start = range.get_datetime("$gte").unwrap();
        let end = range.get_datetime("$lt").unwrap();
        assert_eq!(start.try_to_rfc3339_string().unwrap(), "2021-01-01T00:00:00Z");
        assert_eq!(end.try_to_rfc3339_string().unwrap(), "2022-01-01T00:00:00Z");
        assert_eq!(pipeline.last().unwrap(), &doc! { "$limit": 12 });
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2021").unwrap(), 2021);
        assert!(parse_year("twenty").is_err());
    }
}
