//! # Tour HTTP Handlers
//!
//! | 메서드 | 경로 | 권한 |
//! |--------|------|------|
//! | `GET` | `/api/v1/tours` | - |
//! | `POST` | `/api/v1/tours` | admin, lead-guide |
//! | `GET` | `/api/v1/tours/top-5-cheap` | - |
//! | `GET` | `/api/v1/tours/stats` | - |
//! | `GET` | `/api/v1/tours/monthly-plan/{year}` | admin, lead-guide, guide |
//! | `GET` | `/api/v1/tours/tours-within/{distance}/center/{latlng}/unit/{unit}` | - |
//! | `GET` | `/api/v1/tours/distances/{latlng}/unit/{unit}` | - |
//! | `GET` | `/api/v1/tours/{id}` | - |
//! | `PATCH`, `DELETE` | `/api/v1/tours/{id}` | admin, lead-guide |

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use serde_json::Value;

use crate::core::errors::AppError;
use crate::domain::dto::envelope;
use crate::domain::dto::tours::{CreateTourRequest, UpdateTourRequest};
use crate::domain::entities::users::Role;
use crate::handlers::factory;
use crate::middlewares::AuthMiddleware;
use crate::repositories::query_builder::QueryString;
use crate::repositories::tours::TourRepository;
use crate::services::tours::geo::{parse_distance, DistanceUnit, LatLng};
use crate::services::tours::reports::{apply_top_cheap_alias, parse_year};
use crate::services::tours::TourService;
use crate::utils::bson_json::documents_to_json;

#[get("")]
pub async fn get_all_tours(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::get_all::<TourRepository>(&req).await
}

#[post("", wrap = "AuthMiddleware::required_with_roles(&[Role::Admin, Role::LeadGuide])")]
pub async fn create_tour(
    req: HttpRequest,
    payload: web::Json<CreateTourRequest>,
) -> Result<HttpResponse, AppError> {
    factory::create_one::<TourRepository>(&req, payload.into_inner()).await
}

/// 평점 높고 저렴한 투어 5개 (목록 조회 별칭)
#[get("/top-5-cheap")]
pub async fn top_five_cheap(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let mut query = QueryString::parse(req.query_string());
    apply_top_cheap_alias(&mut query);
    factory::get_all_with::<TourRepository>(&req, &query).await
}

#[get("/stats")]
pub async fn get_tour_stats() -> Result<HttpResponse, AppError> {
    let stats = TourService::instance().stats().await?;
    Ok(HttpResponse::Ok().json(envelope::named(
        "stats",
        Value::Array(documents_to_json(&stats, &[])),
    )))
}

#[get(
    "/monthly-plan/{year}",
    wrap = "AuthMiddleware::required_with_roles(&[Role::Admin, Role::LeadGuide, Role::Guide])"
)]
pub async fn get_monthly_plan(year: web::Path<String>) -> Result<HttpResponse, AppError> {
    let year = parse_year(&year)?;
    let plan = TourService::instance().monthly_plan(year).await?;

    Ok(HttpResponse::Ok().json(envelope::named(
        "plan",
        Value::Array(documents_to_json(&plan, &[])),
    )))
}

#[get("/tours-within/{distance}/center/{latlng}/unit/{unit}")]
pub async fn get_tours_within(
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, AppError> {
    let (distance, latlng, unit) = path.into_inner();
    let distance = parse_distance(&distance)?;
    let center = LatLng::parse(&latlng)?;
    let unit = DistanceUnit::parse(&unit);

    let tours = TourService::instance()
        .tours_within(distance, center, unit)
        .await?;
    Ok(HttpResponse::Ok().json(envelope::list(documents_to_json(&tours, &["__v"]))))
}

#[get("/distances/{latlng}/unit/{unit}")]
pub async fn get_distances(path: web::Path<(String, String)>) -> Result<HttpResponse, AppError> {
    let (latlng, unit) = path.into_inner();
    let center = LatLng::parse(&latlng)?;

    let distances = TourService::instance()
        .distances(center, DistanceUnit::parse(&unit))
        .await?;
    Ok(HttpResponse::Ok().json(envelope::single(Value::Array(documents_to_json(
        &distances,
        &[],
    )))))
}

#[get("/{id}")]
pub async fn get_tour(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::get_one::<TourRepository>(&req).await
}

#[patch("/{id}", wrap = "AuthMiddleware::required_with_roles(&[Role::Admin, Role::LeadGuide])")]
pub async fn update_tour(
    req: HttpRequest,
    payload: web::Json<UpdateTourRequest>,
) -> Result<HttpResponse, AppError> {
    factory::update_one::<TourRepository>(&req, payload.into_inner()).await
}

#[delete("/{id}", wrap = "AuthMiddleware::required_with_roles(&[Role::Admin, Role::LeadGuide])")]
pub async fn delete_tour(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::delete_one::<TourRepository>(&req).await
}
