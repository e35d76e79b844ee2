//! # Review HTTP Handlers
//!
//! `/api/v1/reviews`와 `/api/v1/tours/{tourId}/reviews` 양쪽에 같은 핸들러가 등록됩니다.
//! 중첩 경로에서는 목록이 해당 투어로 한정되고, 생성 시 `tour`가 경로에서 채워집니다.
//! 모든 경로는 로그인이 필요합니다.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::dto::reviews::{CreateReviewRequest, UpdateReviewRequest};
use crate::domain::entities::users::Role;
use crate::handlers::factory;
use crate::middlewares::AuthMiddleware;
use crate::repositories::reviews::ReviewRepository;

#[get("", wrap = "AuthMiddleware::required()")]
pub async fn get_all_reviews(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::get_all::<ReviewRepository>(&req).await
}

/// 작성자(`user`)는 본문에 없으면 로그인 사용자로 채워집니다.
#[post("", wrap = "AuthMiddleware::required_with_role(Role::User)")]
pub async fn create_review(
    req: HttpRequest,
    payload: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    factory::create_one::<ReviewRepository>(&req, payload.into_inner()).await
}

#[get("/{id}", wrap = "AuthMiddleware::required()")]
pub async fn get_review(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::get_one::<ReviewRepository>(&req).await
}

#[patch("/{id}", wrap = "AuthMiddleware::required_with_roles(&[Role::User, Role::Admin])")]
pub async fn update_review(
    req: HttpRequest,
    payload: web::Json<UpdateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    factory::update_one::<ReviewRepository>(&req, payload.into_inner()).await
}

#[delete("/{id}", wrap = "AuthMiddleware::required_with_roles(&[Role::User, Role::Admin])")]
pub async fn delete_review(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::delete_one::<ReviewRepository>(&req).await
}
