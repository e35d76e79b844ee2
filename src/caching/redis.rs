//! # Redis 캐시 클라이언트
//!
//! 인증 미들웨어가 매 요청마다 조회하는 사용자 문서를 캐싱합니다.
//! 값은 `serde_json` 문자열로 저장되며, BSON `ObjectId`/`DateTime`은
//! extended JSON 형태로 왕복됩니다.
//!
//! 단일 TCP 연결을 멀티플렉싱하여 여러 동시 요청을 처리합니다.
//!
//! ## 세대(generation) 기반 캐시 채우기
//!
//! 캐시 미스 후 DB에서 읽은 값을 그대로 저장하면, 그 사이에 끝난 쓰기가
//! 무효화한 키에 오래된 값이 다시 들어갈 수 있습니다.
//!
//! ```text
//! 쓰기:  DB 갱신 ──▶ bump_generation ──▶ del
//! 읽기:  generation(g) ──▶ DB 조회 ──▶ set_if_generation(g)   (세대가 바뀌었으면 저장 안 함)
//! ```

use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::env;

/// 세대 키가 기대값과 같을 때만 값을 저장 (KEYS: 값 키, 세대 키 / ARGV: 기대 세대, JSON, TTL)
const SET_IF_GENERATION: &str = r#"
local current = tonumber(redis.call('GET', KEYS[2]) or '0')
if current == tonumber(ARGV[1]) then
    redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
    return 1
end
return 0
"#;

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

fn codec_error(description: &'static str, detail: String) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, description, detail))
}

impl RedisClient {
    /// `REDIS_URL`(기본값 `redis://localhost:6379`)로 연결하고 PING으로 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;

        value
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| codec_error("Deserialization failed", e.to_string()))
            })
            .transpose()
    }

    /// 현재 세대 번호. 키가 없으면 0입니다.
    pub async fn generation(&self, key: &str) -> Result<i64, redis::RedisError> {
        let mut conn = self.connection().await?;
        let value: Option<i64> = conn.get(key).await?;
        Ok(value.unwrap_or(0))
    }

    /// 세대 번호를 올리고 TTL을 갱신합니다. 캐시 키 삭제 전에 호출해야 합니다.
    pub async fn bump_generation(&self, key: &str, seconds: i64) -> Result<i64, redis::RedisError> {
        let mut conn = self.connection().await?;
        let (generation,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire(key, seconds)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(generation)
    }

    /// `generation_key`가 아직 `expected`일 때만 저장합니다. 저장했으면 `true`.
    pub async fn set_if_generation<T: Serialize>(
        &self,
        key: &str,
        generation_key: &str,
        expected: i64,
        value: &T,
        seconds: u64,
    ) -> Result<bool, redis::RedisError> {
        let json = serde_json::to_string(value)
            .map_err(|e| codec_error("Serialization failed", e.to_string()))?;
        let mut conn = self.connection().await?;

        let stored: i32 = redis::Script::new(SET_IF_GENERATION)
            .key(key)
            .key(generation_key)
            .arg(expected)
            .arg(json)
            .arg(seconds)
            .invoke_async(&mut conn)
            .await?;
        Ok(stored == 1)
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.connection().await?;
        conn.del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;
        conn.del(keys).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.connection().await?;
        conn.keys(pattern).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    #[ignore = "requires a running Redis (REDIS_URL)"]
    async fn test_fill_after_concurrent_write_is_skipped() {
        let redis = RedisClient::new().await.unwrap();
        let key = "test_generation:value";
        let generation_key = "test_generation:value:generation";
        redis.del(key).await.unwrap();
        redis.del(generation_key).await.unwrap();

        // 읽기 시작 시점의 세대
        let seen = redis.generation(generation_key).await.unwrap();
        assert_eq!(seen, 0);

        // 그 사이 쓰기 완료
        assert_eq!(redis.bump_generation(generation_key, 60).await.unwrap(), 1);
        redis.del(key).await.unwrap();

        let stored = redis
            .set_if_generation(key, generation_key, seen, &"stale", 60)
            .await
            .unwrap();
        assert!(!stored);
        assert_eq!(redis.get::<String>(key).await.unwrap(), None);

        let current = redis.generation(generation_key).await.unwrap();
        assert!(redis
            .set_if_generation(key, generation_key, current, &"fresh", 60)
            .await
            .unwrap());
        assert_eq!(redis.get::<String>(key).await.unwrap().as_deref(), Some("fresh"));

        redis.del_multiple(&[key.to_string(), generation_key.to_string()]).await.unwrap();
    }
}
