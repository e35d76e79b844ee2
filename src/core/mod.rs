//! # Core Framework Module
//!
//! 의존성 주입 컨테이너와 전역 에러 타입을 제공합니다.
//!
//! - [`registry`] - `ServiceLocator`와 `inventory` 기반 자동 등록
//! - [`errors`] - `AppError`, 운영/프로그래밍 에러 구분, 환경별 응답 렌더링
//!
//! | Spring | 이 프레임워크 |
//! |--------|---------------|
//! | `@Service` / `@Repository` | `#[service]` / `#[repository]` |
//! | `ApplicationContext` | `ServiceLocator` |
//! | `@Autowired` | `Arc<T>` 필드 자동 주입 |
//! | `@ControllerAdvice` | `AppError::error_response()` |

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
