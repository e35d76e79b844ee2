//! 투어 예약 백엔드 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 서비스를 초기화합니다.
//! MongoDB, Redis 연결과 인덱스를 준비한 뒤 REST API와 페이지를 제공합니다.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use tokio::sync::mpsc;

use tour_booking_backend::caching::redis::RedisClient;
use tour_booking_backend::config::ServerConfig;
use tour_booking_backend::core::registry::ServiceLocator;
use tour_booking_backend::db::Database;
use tour_booking_backend::repositories::reviews::ReviewRepository;
use tour_booking_backend::repositories::tours::TourRepository;
use tour_booking_backend::repositories::users::UserRepository;
use tour_booking_backend::routes::configure_all_routes;

/// Rate Limiting 설정 구조체
#[derive(Debug)]
struct RateLimitConfig {
    per_second: u64,
    burst_size: u32,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 투어 예약 서비스 시작중...");

    let (database, redis_client) = initialize_data_stores().await?;

    // ServiceLocator에 핵심 서비스 등록
    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all()
        .await
        .map_err(|e| io::Error::other(format!("서비스 초기화 실패: {}", e)))?;

    ensure_indexes().await?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server().await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 처리되지 않은 panic이 발생하면 서버를 정상 종료시키고 종료 코드 1로 끝냅니다.
async fn start_http_server() -> io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit_config = load_rate_limit_config();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );

    let server = HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(&bind_address)?
    .workers(ServerConfig::workers())
    .run();

    let panicked = install_panic_shutdown(server.handle());
    server.await?;

    if panicked.load(Ordering::SeqCst) {
        error!("💥 panic으로 인해 서버를 종료했습니다");
        std::process::exit(1);
    }
    Ok(())
}

/// panic 발생 시 서버 정지를 요청하는 훅을 설치합니다.
fn install_panic_shutdown(handle: actix_web::dev::ServerHandle) -> Arc<AtomicBool> {
    let panicked = Arc::new(AtomicBool::new(false));
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("💥 UNCAUGHT PANIC! Shutting down... {}", info);
        default_hook(info);
        let _ = tx.send(());
    }));

    let flag = panicked.clone();
    actix_web::rt::spawn(async move {
        if rx.recv().await.is_some() {
            flag.store(true, Ordering::SeqCst);
            handle.stop(true).await;
        }
    });

    panicked
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 초기화합니다
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new()
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;
    info!("✅ MongoDB 연결 성공");

    let redis_client = RedisClient::new()
        .await
        .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// 유니크/지리 인덱스를 생성합니다
async fn ensure_indexes() -> io::Result<()> {
    let to_io = |e: tour_booking_backend::core::AppError| io::Error::other(e.to_string());

    TourRepository::instance().create_indexes().await.map_err(to_io)?;
    UserRepository::instance().create_indexes().await.map_err(to_io)?;
    ReviewRepository::instance().create_indexes().await.map_err(to_io)?;

    info!("✅ 인덱스 준비 완료");
    Ok(())
}

/// CORS 설정을 구성합니다
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_methods(vec!["GET", "POST", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        // 자격 증명(쿠키 등) 지원
        .supports_credentials()
        .max_age(3600)
}

/// 환경변수에서 Rate Limiting 설정을 로드합니다
///
/// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
/// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
fn load_rate_limit_config() -> RateLimitConfig {
    let per_second = std::env::var("RATE_LIMIT_PER_SECOND")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
            100
        });

    let burst_size = std::env::var("RATE_LIMIT_BURST_SIZE")
        .unwrap_or_else(|_| "200".to_string())
        .parse::<u32>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
            200
        });

    let config = RateLimitConfig {
        per_second,
        burst_size,
    };

    info!("Rate Limiting 설정 로드됨: {:?}", config);
    config
}
