//! # HTML 빌더
//!
//! 템플릿 엔진 없이 서버 렌더링 페이지를 만듭니다. 사용자 데이터는 모두
//! [`escape`]를 거쳐 출력됩니다.

use serde_json::Value;

use crate::domain::entities::tours::Tour;
use crate::domain::entities::users::User;

/// 투어 상세 페이지의 Content-Security-Policy
pub const TOUR_PAGE_CSP: &str = "default-src 'self' https://*.mapbox.com ;base-uri 'self';\
block-all-mixed-content;font-src 'self' https: data:;frame-ancestors 'self';\
img-src 'self' data:;object-src 'none';\
script-src https://cdnjs.cloudflare.com https://api.mapbox.com 'self' blob: ;\
script-src-attr 'none';style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests;";

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn header(user: Option<&User>) -> String {
    let nav_user = match user {
        Some(user) => format!(
            r#"<a class="nav__el nav__el--logout" href="/api/v1/users/logout">Log out</a>
<a class="nav__el" href="/me"><img class="nav__user-img" src="/img/users/{}" alt="Photo of {}"><span>{}</span></a>"#,
            escape(&user.photo),
            escape(&user.name),
            escape(user.name.split_whitespace().next().unwrap_or(&user.name)),
        ),
        None => r#"<a class="nav__el" href="/login">Log in</a>"#.to_string(),
    };

    format!(
        r#"<header class="header">
<nav class="nav nav--tours"><a class="nav__el" href="/">All tours</a></nav>
<nav class="nav nav--user">{}</nav>
</header>"#,
        nav_user
    )
}

/// 공통 레이아웃. `title`은 `Natours | {title}` 형태로 출력됩니다.
pub fn layout(title: &str, user: Option<&User>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="/css/style.css">
<title>Natours | {}</title>
</head>
<body>
{}
<main class="main">
{}
</main>
</body>
</html>"#,
        escape(title),
        header(user),
        body
    )
}

fn tour_card(tour: &Tour) -> String {
    let start = tour
        .start_dates
        .first()
        .and_then(|date| date.try_to_rfc3339_string().ok())
        .map(|date| date.chars().take(10).collect::<String>())
        .unwrap_or_default();

    format!(
        r#"<div class="card">
<div class="card__header"><h3 class="heading-tertirary"><span>{name}</span></h3></div>
<div class="card__details">
<h4 class="card__sub-heading">{difficulty} {duration}-day tour</h4>
<p class="card__text">{summary}</p>
<div class="card__data"><span>{start}</span></div>
<div class="card__data"><span>{stops} stops</span></div>
<div class="card__data"><span>{group} people</span></div>
</div>
<div class="card__footer">
<p><span class="card__footer-value">${price}</span> <span class="card__footer-text">per person</span></p>
<p class="card__ratings"><span class="card__footer-value">{average}</span> <span class="card__footer-text">rating ({quantity})</span></p>
<a class="btn btn--green btn--small" href="/tour/{slug}">Details</a>
</div>
</div>"#,
        name = escape(&tour.name),
        difficulty = tour.difficulty.as_str(),
        duration = tour.duration,
        summary = escape(&tour.summary),
        start = start,
        stops = tour.locations.len(),
        group = tour.max_group_size,
        price = tour.price,
        average = tour.ratings_average,
        quantity = tour.ratings_quantity,
        slug = escape(&tour.slug),
    )
}

pub fn overview_page(tours: &[Tour], user: Option<&User>) -> String {
    let cards: String = tours.iter().map(tour_card).collect();
    layout(
        "All tours",
        user,
        &format!(r#"<div class="card-container">{}</div>"#, cards),
    )
}

fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => escape(s),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn review_card(review: &Value) -> String {
    let user = review.get("user").cloned().unwrap_or(Value::Null);
    let rating = review.get("rating").and_then(Value::as_i64).unwrap_or(0);
    let stars: String = (1..=5)
        .map(|star| {
            let state = if rating >= star { "active" } else { "inactive" };
            format!(r#"<span class="reviews__star reviews__star--{}">★</span>"#, state)
        })
        .collect();

    format!(
        r#"<div class="reviews__card">
<div class="reviews__avatar"><img class="reviews__avatar-img" src="/img/users/{photo}" alt="{name}"><h6 class="reviews__user">{name}</h6></div>
<p class="reviews__text">{text}</p>
<div class="reviews__rating">{stars}</div>
</div>"#,
        photo = text(&user, "photo"),
        name = text(&user, "name"),
        text = text(review, "review"),
        stars = stars,
    )
}

/// 투어 상세. `tour`는 가이드와 리뷰가 채워진 JSON 문서입니다.
pub fn tour_page(tour: &Value, user: Option<&User>) -> String {
    let guides: String = tour
        .get("guides")
        .and_then(Value::as_array)
        .map(|guides| {
            guides
                .iter()
                .map(|guide| {
                    format!(
                        r#"<div class="overview-box__detail"><span class="overview-box__label">{}</span><span class="overview-box__text">{}</span></div>"#,
                        text(guide, "role"),
                        text(guide, "name"),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let reviews: String = tour
        .get("reviews")
        .and_then(Value::as_array)
        .map(|reviews| reviews.iter().map(review_card).collect())
        .unwrap_or_default();

    let body = format!(
        r#"<section class="section-header">
<h1 class="heading-primary"><span>{name} tour</span></h1>
<div class="heading-box__group">
<div class="heading-box__detail"><span class="heading-box__text">{duration} days</span></div>
</div>
</section>
<section class="section-description">
<div class="overview-box">
<div class="overview-box__group">
<h2 class="heading-secondary ma-bt-lg">Quick facts</h2>
<div class="overview-box__detail"><span class="overview-box__label">Difficulty</span><span class="overview-box__text">{difficulty}</span></div>
<div class="overview-box__detail"><span class="overview-box__label">Participants</span><span class="overview-box__text">{group} people</span></div>
<div class="overview-box__detail"><span class="overview-box__label">Rating</span><span class="overview-box__text">{average} / 5</span></div>
</div>
<div class="overview-box__group"><h2 class="heading-secondary ma-bt-lg">Your tour guides</h2>{guides}</div>
</div>
<div class="description-box"><h2 class="heading-secondary ma-bt-lg">About {name} tour</h2><p class="description__text">{description}</p></div>
</section>
<section class="section-reviews"><div class="reviews">{reviews}</div></section>
<section class="section-cta"><p class="cta__text">{duration} days. 1 adventure. Infinite memories. Make it yours today!</p></section>"#,
        name = text(tour, "name"),
        duration = text(tour, "duration"),
        difficulty = text(tour, "difficulty"),
        group = text(tour, "maxGroupSize"),
        average = text(tour, "ratingsAverage"),
        description = text(tour, "description"),
        guides = guides,
        reviews = reviews,
    );

    let title = tour.get("slug").and_then(Value::as_str).unwrap_or("Tour");
    layout(title, user, &body)
}

pub fn login_page(user: Option<&User>) -> String {
    let body = r#"<div class="login-form">
<h2 class="heading-secondary ma-bt-lg">Log into your account</h2>
<form class="form form--login">
<div class="form__group"><label class="form__label" for="email">Email address</label><input class="form__input" id="email" type="email" placeholder="you@example.com" required></div>
<div class="form__group ma-bt-md"><label class="form__label" for="password">Password</label><input class="form__input" id="password" type="password" placeholder="••••••••" required minlength="8"></div>
<div class="form__group"><button class="btn btn--green">Login</button></div>
</form>
</div>"#;
    layout("Log into your account", user, body)
}

pub fn error_page(message: &str, user: Option<&User>) -> String {
    let body = format!(
        r#"<div class="error">
<div class="error__title"><h2 class="heading-secondary heading-secondary--error">Uh oh! Something went wrong!</h2></div>
<div class="error__msg">{}</div>
</div>"#,
        escape(message)
    );
    layout("Something went wrong!", user, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_layout_shows_login_link_for_anonymous() {
        let html = layout("All tours", None, "");
        assert!(html.contains("<title>Natours | All tours</title>"));
        assert!(html.contains(r#"href="/login""#));
    }

    #[test]
    fn test_layout_shows_user_when_logged_in() {
        let user = User::new("Jonas Schmedtmann".into(), "jonas@example.com".into(), "x".into());
        let html = layout("All tours", Some(&user), "");
        assert!(html.contains("<span>Jonas</span>"));
        assert!(html.contains("Log out"));
    }

    #[test]
    fn test_tour_page_escapes_review_text() {
        let tour = json!({
            "name": "The Forest Hiker",
            "slug": "the-forest-hiker",
            "duration": 5,
            "reviews": [
                { "review": "<b>great</b>", "rating": 4, "user": { "name": "Lourdes", "photo": "u.jpg" } }
            ]
        });

        let html = tour_page(&tour, None);
        assert!(html.contains("<title>Natours | the-forest-hiker</title>"));
        assert!(html.contains("&lt;b&gt;great&lt;/b&gt;"));
        assert_eq!(html.matches("reviews__star--active").count(), 4);
    }

    #[test]
    fn test_error_page_contains_message() {
        let html = error_page("No document found with that ID", None);
        assert!(html.contains("No document found with that ID"));
    }
}
