//! # User Management HTTP Handlers
//!
//! 로그인한 사용자의 셀프 서비스(`/me`, `/update-me`, `/delete-me`)와
//! 관리자용 사용자 CRUD입니다. 관리자 CRUD는 범용 핸들러를 그대로 사용합니다.
//!
//! | 메서드 | 경로 | 권한 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `GET` | `/users/me` | 로그인 | 200 |
//! | `PATCH` | `/users/update-me` | 로그인 | 200 |
//! | `DELETE` | `/users/delete-me` | 로그인 | 204 |
//! | `GET` | `/users` | admin | 200 |
//! | `POST` | `/users` | admin | 500 (`/signup` 사용) |
//! | `GET`, `PATCH`, `DELETE` | `/users/{id}` | admin | 200 / 200 / 204 |
//!
//! 관리자 삭제도 소프트 삭제(`active: false`)입니다.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use mongodb::bson::oid::ObjectId;
use serde_json::json;
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::envelope;
use crate::domain::dto::users::request::{AdminUpdateUserRequest, UpdateMeRequest};
use crate::domain::dto::users::response::UserResponse;
use crate::domain::entities::users::Role;
use crate::handlers::factory;
use crate::middlewares::AuthMiddleware;
use crate::repositories::users::UserRepository;
use crate::services::users::UserService;

pub const USE_SIGNUP_MESSAGE: &str = "This route is not defined! Please use /signup instead";

fn current_user_id(user: &AuthenticatedUser) -> Result<ObjectId, AppError> {
    user.user
        .id
        .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))
}

#[get("/me", wrap = "AuthMiddleware::required()")]
pub async fn get_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    factory::get_by_id::<UserRepository>(current_user_id(&user)?).await
}

#[patch("/update-me", wrap = "AuthMiddleware::required()")]
pub async fn update_me(
    user: AuthenticatedUser,
    payload: web::Json<UpdateMeRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    request.ensure_no_password()?;
    request.validate()?;

    let updated = UserService::instance()
        .update_me(current_user_id(&user)?, request)
        .await?;
    Ok(HttpResponse::Ok().json(envelope::named("user", json!(UserResponse::from(updated)))))
}

#[delete("/delete-me", wrap = "AuthMiddleware::required()")]
pub async fn delete_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    UserService::instance()
        .delete_me(current_user_id(&user)?)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("", wrap = "AuthMiddleware::required_with_role(Role::Admin)")]
pub async fn get_all_users(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::get_all::<UserRepository>(&req).await
}

/// 관리자 사용자 생성은 지원하지 않습니다.
#[post("", wrap = "AuthMiddleware::required_with_role(Role::Admin)")]
pub async fn create_user() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({
        "status": "error",
        "message": USE_SIGNUP_MESSAGE,
    }))
}

#[get("/{id}", wrap = "AuthMiddleware::required_with_role(Role::Admin)")]
pub async fn get_user(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::get_one::<UserRepository>(&req).await
}

/// 비밀번호는 이 경로로 변경할 수 없습니다.
#[patch("/{id}", wrap = "AuthMiddleware::required_with_role(Role::Admin)")]
pub async fn update_user(
    req: HttpRequest,
    payload: web::Json<AdminUpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    factory::update_one::<UserRepository>(&req, payload.into_inner()).await
}

#[delete("/{id}", wrap = "AuthMiddleware::required_with_role(Role::Admin)")]
pub async fn delete_user(req: HttpRequest) -> Result<HttpResponse, AppError> {
    factory::delete_one::<UserRepository>(&req).await
}
