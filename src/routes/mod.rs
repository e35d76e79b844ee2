//! API 라우트 설정 모듈
//!
//! 리소스별 스코프를 묶어 애플리케이션에 등록합니다. 권한 검사는 각 핸들러의
//! `wrap = "AuthMiddleware::..."`로 라우트 단위로 적용됩니다.
//!
//! # Route Groups
//!
//! - `/api/v1/tours` - 투어 CRUD, 별칭, 통계, 지리 조회, 중첩 리뷰
//! - `/api/v1/reviews` - 리뷰 CRUD
//! - `/api/v1/users` - 인증, 본인 계정, 관리자 사용자 CRUD
//! - `/`, `/tour/{slug}`, `/login` - 서버 렌더링 페이지
//! - `/health` - 헬스체크
//!
//! 고정 경로(`/top-5-cheap`, `/me` 등)는 같은 메서드의 `/{id}`보다 먼저 등록해야 합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! let app = App::new().configure(configure_all_routes);
//! ```

use actix_web::web;
use serde_json::json;

use crate::core::errors::json_error_handler;
use crate::handlers;

/// JSON 본문 최대 크기 (10 kB)
pub const JSON_BODY_LIMIT: usize = 10 * 1024;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(json_error_handler),
    );

    // Health check endpoint
    cfg.service(health_check);

    configure_tour_routes(cfg);
    configure_review_routes(cfg);
    configure_user_routes(cfg);
    configure_view_routes(cfg);
}

/// 투어 라우트
///
/// `/{tourId}/reviews` 아래에는 리뷰 핸들러가 그대로 재사용됩니다.
fn configure_tour_routes(cfg: &mut web::ServiceConfig) {
    use handlers::{reviews, tours};

    cfg.service(
        web::scope("/api/v1/tours")
            .service(
                web::scope("/{tourId}/reviews")
                    .service(reviews::get_all_reviews)
                    .service(reviews::create_review)
                    .service(reviews::get_review)
                    .service(reviews::update_review)
                    .service(reviews::delete_review),
            )
            .service(tours::top_five_cheap)
            .service(tours::get_tour_stats)
            .service(tours::get_monthly_plan)
            .service(tours::get_tours_within)
            .service(tours::get_distances)
            .service(tours::get_all_tours)
            .service(tours::create_tour)
            .service(tours::get_tour)
            .service(tours::update_tour)
            .service(tours::delete_tour),
    );
}

fn configure_review_routes(cfg: &mut web::ServiceConfig) {
    use handlers::reviews;

    cfg.service(
        web::scope("/api/v1/reviews")
            .service(reviews::get_all_reviews)
            .service(reviews::create_review)
            .service(reviews::get_review)
            .service(reviews::update_review)
            .service(reviews::delete_review),
    );
}

/// 사용자/인증 라우트
///
/// ## Public
/// - `POST /signup`, `POST /login`, `GET /logout`
/// - `POST /forgot-password`, `PATCH /reset-password/{token}`
///
/// ## 로그인 필요
/// - `PATCH /update-my-password`, `GET /me`, `PATCH /update-me`, `DELETE /delete-me`
///
/// ## admin 전용
/// - `GET /`, `POST /`, `GET|PATCH|DELETE /{id}`
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    use handlers::{auth, users};

    cfg.service(
        web::scope("/api/v1/users")
            // Public
            .service(auth::signup)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::forgot_password)
            .service(auth::reset_password)
            // 로그인 필요
            .service(auth::update_my_password)
            .service(users::get_me)
            .service(users::update_me)
            .service(users::delete_me)
            // admin
            .service(users::get_all_users)
            .service(users::create_user)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user),
    );
}

fn configure_view_routes(cfg: &mut web::ServiceConfig) {
    use handlers::views;

    cfg.service(views::overview)
        .service(views::tour_page)
        .service(views::login_form);
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:3000/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "tour_booking_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "dependency_injection": "Singleton Macro"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_logout_sets_expiring_cookie() {
        let app = test::init_service(
            App::new().service(web::scope("/api/v1/users").service(handlers::auth::logout)),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/v1/users/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == crate::config::JwtConfig::COOKIE_NAME)
            .unwrap();
        assert_eq!(cookie.value(), handlers::auth::LOGGED_OUT);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_validation_error() {
        #[actix_web::post("/echo")]
        async fn echo(body: web::Json<serde_json::Value>) -> actix_web::HttpResponse {
            actix_web::HttpResponse::Ok().json(body.into_inner())
        }

        let app = test::init_service(
            App::new()
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .service(echo),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/echo")
            .insert_header(("content-type", "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
