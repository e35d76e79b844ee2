//! 데이터 및 서버 설정 관리 모듈
//!
//! 데이터베이스, 서버, 실행 환경, 비밀번호 해싱 관련 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 개발 환경 - 에러 응답에 상세 정보 포함
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 운영 에러 메시지만 노출, secure 쿠키
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 또는 `NODE_ENV` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        let raw = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "production".to_string());
        Self::from_str(&raw)
    }

    /// 문자열에서 Environment를 생성합니다. 알 수 없는 값은 `Production`입니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 패스워드 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// 현재 환경에 맞는 bcrypt cost를 반환합니다.
    ///
    /// `BCRYPT_COST`가 4-15 범위로 지정되어 있으면 그 값을 우선합니다.
    pub fn bcrypt_cost() -> u32 {
        env::var("BCRYPT_COST")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(&Environment::current()))
    }

    /// 특정 환경에 대한 bcrypt cost
    ///
    /// - Development/Test: 4 (빠른 처리)
    /// - Staging: 10
    /// - Production: 12
    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development | Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// 서버 포트 (`PORT`, 기본값 8080)
    pub fn port() -> u16 {
        env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080)
    }

    /// 서버 호스트 (`HOST`, 기본값 "0.0.0.0")
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    /// 워커 스레드 수 (`SERVER_WORKERS`, 기본값 4)
    pub fn workers() -> usize {
        env::var("SERVER_WORKERS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|workers: &usize| *workers > 0)
            .unwrap_or(4)
    }

    /// 메일 링크 등에 쓰는 외부 접속 주소 (`PUBLIC_URL`, 기본값 `http://localhost:{PORT}`)
    ///
    /// 요청의 `Host` 헤더는 클라이언트가 조작할 수 있으므로 사용하지 않습니다.
    pub fn public_url() -> String {
        Self::resolve_public_url(env::var("PUBLIC_URL").ok().as_deref(), Self::port())
    }

    fn resolve_public_url(raw: Option<&str>, port: u16) -> String {
        raw.map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("http://localhost:{}", port))
    }
}

/// MongoDB 연결 설정
///
/// `DATABASE`에는 `<PASSWORD>` 자리표시자를 포함한 연결 문자열을 두고,
/// 실제 비밀번호는 `DATABASE_PASSWORD`로 분리해서 주입합니다.
///
/// ```bash
/// DATABASE=mongodb+srv://natours:<PASSWORD>@cluster0.mongodb.net/natours
/// DATABASE_PASSWORD=secret
/// DATABASE_NAME=natours
/// ```
pub struct DatabaseConfig;

impl DatabaseConfig {
    pub const PASSWORD_PLACEHOLDER: &'static str = "<PASSWORD>";

    /// 비밀번호가 치환된 연결 문자열
    ///
    /// `DATABASE`가 없으면 `MONGODB_URI`, 그것도 없으면 로컬 기본값을 사용합니다.
    pub fn connection_string() -> String {
        let template = env::var("DATABASE")
            .or_else(|_| env::var("MONGODB_URI"))
            .unwrap_or_else(|_| {
                log::warn!("DATABASE not set, falling back to mongodb://localhost:27017");
                "mongodb://localhost:27017".to_string()
            });
        let password = env::var("DATABASE_PASSWORD").unwrap_or_default();

        Self::resolve_connection_string(&template, &password)
    }

    pub fn resolve_connection_string(template: &str, password: &str) -> String {
        template.replace(Self::PASSWORD_PLACEHOLDER, password)
    }

    /// 데이터베이스 이름 (`DATABASE_NAME`, 기본값 "natours")
    pub fn database_name() -> String {
        env::var("DATABASE_NAME").unwrap_or_else(|_| "natours".to_string())
    }
}
