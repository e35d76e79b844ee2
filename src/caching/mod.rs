//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 캐시입니다. 인증 미들웨어가 매 요청마다 조회하는
//! 활성 사용자를 `user_repository:{id}` 키로 10분간 보관하고, 사용자 문서가
//! 바뀌면 `{key}:generation`을 올린 뒤 해당 키를 지웁니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! let key = self.cache_key(&id.to_hex());
//! let generation_key = format!("{}:generation", key);
//!
//! // 읽기: 조회 전에 세대를 기억했다가 그대로일 때만 저장
//! let seen = self.redis.generation(&generation_key).await?;
//! self.redis.set_if_generation(&key, &generation_key, seen, &user, 600).await?;
//!
//! // 쓰기: 세대를 올린 뒤 삭제
//! self.redis.bump_generation(&generation_key, 86_400).await?;
//! self.redis.del(&key).await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
