//! # Rendered Views
//!
//! 서버 렌더링 페이지입니다. 모든 경로는 선택적 인증을 사용해
//! 쿠키가 유효하면 헤더에 로그인 사용자를 표시합니다.

use actix_web::http::header::{ContentType, CONTENT_SECURITY_POLICY};
use actix_web::{get, web, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::auth::authenticated_user::OptionalUser;
use crate::domain::entities::users::User;
use crate::handlers::factory::NO_DOCUMENT_FOUND;
use crate::middlewares::AuthMiddleware;
use crate::repositories::crud::CrudRepository;
use crate::repositories::tours::TourRepository;
use crate::utils::bson_json::document_to_json;
use crate::utils::html;

fn viewer(user: &OptionalUser) -> Option<&User> {
    user.0.as_ref().map(|auth| &auth.user)
}

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

#[get("/", wrap = "AuthMiddleware::optional()")]
pub async fn overview(user: OptionalUser) -> Result<HttpResponse, AppError> {
    let tours = TourRepository::instance().find_all().await?;
    Ok(html_response(html::overview_page(&tours, viewer(&user))))
}

#[get("/tour/{slug}", wrap = "AuthMiddleware::optional()")]
pub async fn tour_page(
    slug: web::Path<String>,
    user: OptionalUser,
) -> Result<HttpResponse, AppError> {
    let Some(tour) = TourRepository::instance().find_by_slug(&slug).await? else {
        return Ok(HttpResponse::NotFound()
            .content_type(ContentType::html())
            .body(html::error_page(NO_DOCUMENT_FOUND, viewer(&user))));
    };

    let tour = document_to_json(&tour, <TourRepository as CrudRepository>::HIDDEN_FIELDS);
    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_SECURITY_POLICY, html::TOUR_PAGE_CSP))
        .content_type(ContentType::html())
        .body(html::tour_page(&tour, viewer(&user))))
}

#[get("/login", wrap = "AuthMiddleware::optional()")]
pub async fn login_form(user: OptionalUser) -> HttpResponse {
    html_response(html::login_page(viewer(&user)))
}
