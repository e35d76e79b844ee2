//! # Application Error Handling System
//!
//! 투어 예약 백엔드의 중앙 집중식 에러 처리 모듈입니다.
//! 모든 핸들러와 미들웨어는 `AppError`를 반환하고, 응답 변환은
//! `ResponseError` 구현 한 곳에서만 이루어집니다.
//!
//! ## 에러 분류
//!
//! | AppError | HTTP Status | 분류 |
//! |----------|-------------|------|
//! | `ValidationError` | 400 | 운영(operational) |
//! | `AuthenticationError` | 401 | 운영 |
//! | `AuthorizationError` | 403 | 운영 |
//! | `NotFound` | 404 | 운영 |
//! | `ConflictError` | 409 | 운영 |
//! | `DatabaseError` | 500 | 프로그래밍/알 수 없음 |
//! | `RedisError` | 500 | 프로그래밍/알 수 없음 |
//! | `ExternalServiceError` | 500 | 프로그래밍/알 수 없음 |
//! | `EmailDeliveryError` | 500 | 운영 |
//! | `InternalError` | 500 | 프로그래밍/알 수 없음 |
//!
//! 운영 에러는 메시지를 그대로 클라이언트에 전달합니다. 나머지는 서버 로그에
//! 남기고, 프로덕션에서는 `"Something went wrong!"`만 응답합니다.
//! 개발 환경에서는 모든 에러의 상세 정보가 응답에 포함됩니다.
//!
//! ## 응답 형식
//!
//! ```json
//! { "status": "fail", "message": "No document found with that ID" }
//! ```
//!
//! `status`는 4xx이면 `"fail"`, 5xx이면 `"error"`입니다.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use actix_web::error::JsonPayloadError;
use serde_json::json;
use thiserror::Error;

use crate::config::Environment;

/// 프로덕션에서 프로그래밍 에러 대신 노출되는 메시지
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// MongoDB duplicate key 에러 코드
const DUPLICATE_KEY_CODE: i32 = 11000;

/// 애플리케이션 전역 에러 타입
///
/// `thiserror`로 `Error`를 구현하고, `actix_web::ResponseError`를 통해
/// `{status, message}` 형식의 JSON 응답으로 변환됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400)
    ///
    /// 잘못된 ObjectId(cast error), 스키마 검증 실패, 잘못된 JSON 본문을 포함합니다.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 없음 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 중복 키 등 충돌 (409)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 (401)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 (403)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 메일 전송 등 외부 서비스 실패 (500)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 메일 발송 실패 (500, 메시지는 클라이언트에 그대로 노출)
    #[error("Email delivery error: {0}")]
    EmailDeliveryError(String),

    /// 예상하지 못한 내부 에러 (500)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 잘못된 식별자 값에 대한 cast 에러
    pub fn invalid_id(value: &str) -> Self {
        AppError::ValidationError(format!("Invalid _id: {}", value))
    }

    /// 에러에 대응하는 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 클라이언트에게 메시지를 그대로 보여줘도 되는 예상된 에러인지 여부
    pub fn is_operational(&self) -> bool {
        match self {
            AppError::EmailDeliveryError(_) => true,
            _ => !self.status().is_server_error(),
        }
    }

    /// 응답 envelope의 `status` 값
    pub fn status_label(&self) -> &'static str {
        if self.status().is_client_error() {
            "fail"
        } else {
            "error"
        }
    }

    /// 접두어 없이 원본 메시지만 반환합니다.
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(msg)
            | AppError::RedisError(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::AuthorizationError(msg)
            | AppError::ExternalServiceError(msg)
            | AppError::EmailDeliveryError(msg)
            | AppError::InternalError(msg) => msg,
        }
    }

    /// 에러 종류 이름 (개발 모드 응답용)
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DatabaseError",
            AppError::RedisError(_) => "RedisError",
            AppError::ValidationError(_) => "ValidationError",
            AppError::NotFound(_) => "NotFound",
            AppError::ConflictError(_) => "ConflictError",
            AppError::AuthenticationError(_) => "AuthenticationError",
            AppError::AuthorizationError(_) => "AuthorizationError",
            AppError::ExternalServiceError(_) => "ExternalServiceError",
            AppError::EmailDeliveryError(_) => "EmailDeliveryError",
            AppError::InternalError(_) => "InternalError",
        }
    }

    /// 실행 환경에 맞춰 에러 응답을 만듭니다.
    ///
    /// - Development: `status`, `error`(종류와 상세), `message`, `stack`
    /// - 그 외: 운영 에러는 `status`, `message`만, 프로그래밍 에러는 일반 메시지
    pub fn render(&self, env: &Environment) -> HttpResponse {
        let status = self.status();

        if !self.is_operational() {
            log::error!("💥 {} ({})", self, status.as_u16());
        }

        let body = match env {
            Environment::Development => json!({
                "status": self.status_label(),
                "error": {
                    "kind": self.kind(),
                    "statusCode": status.as_u16(),
                    "isOperational": self.is_operational(),
                    "detail": self.to_string(),
                },
                "message": self.message(),
                "stack": format!("{:?}", self),
            }),
            _ if self.is_operational() => json!({
                "status": self.status_label(),
                "message": self.message(),
            }),
            _ => json!({
                "status": self.status_label(),
                "message": GENERIC_ERROR_MESSAGE,
            }),
        };

        HttpResponse::build(status).json(body)
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        self.render(&Environment::current())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// MongoDB 에러 메시지에서 중복된 값을 추출합니다.
///
/// `... dup key: { name: "The Forest Hiker" }` → `"The Forest Hiker"`
pub fn duplicate_value(message: &str) -> String {
    let tail = message
        .find("dup key:")
        .map(|idx| &message[idx + "dup key:".len()..])
        .unwrap_or(message);

    if let Some(start) = tail.find('"') {
        if let Some(len) = tail[start + 1..].find('"') {
            return tail[start..start + len + 2].to_string();
        }
    }

    let trimmed = tail.trim().trim_start_matches('{').trim_end_matches('}').trim();
    match trimmed.split_once(':') {
        Some((_, value)) => value.trim().to_string(),
        None => trimmed.to_string(),
    }
}

fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            Some(write_error.message.as_str())
        }
        ErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY_CODE => {
            Some(command_error.message.as_str())
        }
        _ => None,
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        match duplicate_key_message(&err) {
            Some(message) => AppError::ConflictError(format!(
                "Duplicate field value: {}. Please use another value!",
                duplicate_value(message)
            )),
            None => AppError::DatabaseError(err.to_string()),
        }
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization failed: {}", err))
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::DatabaseError(format!("BSON deserialization failed: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid ({})", field, e.code),
                })
            })
            .collect();

        AppError::ValidationError(format!("Validation failed: {}", messages.join(". ")))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => AppError::AuthenticationError(
                "Your token has expired! Please log in again.".to_string(),
            ),
            _ => AppError::AuthenticationError("Invalid token. Please log in again!".to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalError(format!("Password hashing failed: {}", err))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::RedisError(err.to_string())
    }
}

/// 잘못된 JSON 본문을 검증 에러로 변환하는 `JsonConfig` 에러 핸들러
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid input data. {}", err)).into()
}
