//! 지리 쿼리 헬퍼
//!
//! 경로 파라미터(`lat,lng`, 거리, 단위)를 파싱하고 `$geoWithin` / `$geoNear` 단계를 만듭니다.
//! GeoJSON 좌표 순서는 `[lng, lat]`입니다.

use mongodb::bson::{doc, Document};

use crate::core::errors::{AppError, AppResult};

pub const LAT_LNG_FORMAT_MESSAGE: &str =
    "Please provide latitude and longitude in the format lat,lng.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

impl DistanceUnit {
    /// `mi`만 마일이고 나머지는 킬로미터로 취급합니다.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("mi") {
            DistanceUnit::Miles
        } else {
            DistanceUnit::Kilometers
        }
    }

    /// `$centerSphere` 반경(라디안) 계산용 지구 반지름
    pub fn earth_radius(self) -> f64 {
        match self {
            DistanceUnit::Miles => 3963.2,
            DistanceUnit::Kilometers => 6378.1,
        }
    }

    /// `$geoNear` 거리(미터) 변환 계수
    pub fn distance_multiplier(self) -> f64 {
        match self {
            DistanceUnit::Miles => 0.000621371,
            DistanceUnit::Kilometers => 0.001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// `"34.111745,-118.113491"` 형식
    pub fn parse(raw: &str) -> AppResult<Self> {
        let invalid = || AppError::ValidationError(LAT_LNG_FORMAT_MESSAGE.to_string());

        let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid());
        }
        Ok(Self { lat, lng })
    }

    pub fn coordinates(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

pub fn parse_distance(raw: &str) -> AppResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|distance| distance.is_finite() && *distance >= 0.0)
        .ok_or_else(|| AppError::ValidationError("Distance must be a non-negative number.".to_string()))
}

/// 중심점에서 `distance` 이내에 출발지가 있는 투어
pub fn within_filter(distance: f64, center: LatLng, unit: DistanceUnit) -> Document {
    let radius = distance / unit.earth_radius();
    doc! {
        "startLocation": {
            "$geoWithin": { "$centerSphere": [center.coordinates().to_vec(), radius] }
        }
    }
}

/// 중심점에서 각 투어 출발지까지의 거리. `$geoNear`는 파이프라인 첫 단계여야 합니다.
pub fn distances_pipeline(center: LatLng, unit: DistanceUnit) -> Vec<Document> {
    vec![
        doc! {
            "$geoNear": {
                "near": { "type": "Point", "coordinates": center.coordinates().to_vec() },
                "distanceField": "distance",
                "distanceMultiplier": unit.distance_multiplier(),
                "spherical": true,
            }
        },
        doc! { "$project": { "distance": 1, "name": 1 } },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lat_lng() {
        let center = LatLng::parse("34.111745,-118.113491").unwrap();
        assert_eq!(center.lat, 34.111745);
        assert_eq!(center.coordinates(), [-118.113491, 34.111745]);

        for raw in ["34.1", "abc,def", "100,0", ""] {
            match LatLng::parse(raw) {
                Err(AppError::ValidationError(msg)) => assert_eq!(msg, LAT_LNG_FORMAT_MESSAGE),
                other => panic!("unexpected result for {:?}: {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_unit_constants() {
        assert_eq!(DistanceUnit::parse("mi"), DistanceUnit::Miles);
        assert_eq!(DistanceUnit::parse("km"), DistanceUnit::Kilometers);
        assert_eq!(DistanceUnit::Miles.distance_multiplier(), 0.000621371);
        assert_eq!(DistanceUnit::Kilometers.distance_multiplier(), 0.001);
    }

    #[test]
    fn test_within_filter_radius_in_radians() {
        let center = LatLng { lat: 34.0, lng: -118.0 };
        let filter = within_filter(3963.2, center, DistanceUnit::Miles);

        let sphere = filter
            .get_document("startLocation")
            .unwrap()
            .get_document("$geoWithin")
            .unwrap()
            .get_array("$centerSphere")
            .unwrap();
        assert_eq!(sphere[1].as_f64(), Some(1.0));
    }

    #[test]
    fn test_distance_must_be_number() {
        assert_eq!(parse_distance("250").unwrap(), 250.0);
        assert!(parse_distance("far").is_err());
        assert!(parse_distance("-1").is_err());
    }

    #[test]
    fn test_distances_pipeline_starts_with_geo_near() {
        let pipeline = distances_pipeline(LatLng { lat: 1.0, lng: 2.0 }, DistanceUnit::Kilometers);
        assert!(pipeline[0].contains_key("$geoNear"));
        assert_eq!(
            pipeline[0]
                .get_document("$geoNear")
                .unwrap()
                .get_f64("distanceMultiplier")
                .unwrap(),
            0.001
        );
    }
}
