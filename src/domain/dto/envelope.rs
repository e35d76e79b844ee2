//! # 응답 Envelope
//!
//! 성공 응답은 모두 `{ "status": "success", ... }` 형식을 따릅니다.
//!
//! ```json
//! { "status": "success", "results": 2, "data": { "data": [ ... ] } }
//! { "status": "success", "data": { "data": { ... } } }
//! { "status": "success", "token": "...", "data": { "user": { ... } } }
//! ```

use serde_json::{json, Value};

pub const SUCCESS: &str = "success";

/// 목록 응답
pub fn list(docs: Vec<Value>) -> Value {
    json!({
        "status": SUCCESS,
        "results": docs.len(),
        "data": { "data": docs },
    })
}

/// 단일 문서 응답
pub fn single(doc: Value) -> Value {
    json!({
        "status": SUCCESS,
        "data": { "data": doc },
    })
}

/// `data` 아래에 이름 있는 필드를 두는 응답 (`stats`, `plan`, `user` 등)
pub fn named(key: &str, value: Value) -> Value {
    let mut data = serde_json::Map::new();
    data.insert(key.to_string(), value);
    json!({
        "status": SUCCESS,
        "data": Value::Object(data),
    })
}

/// 토큰 발급 응답
pub fn with_token(token: &str, user: Value) -> Value {
    json!({
        "status": SUCCESS,
        "token": token,
        "data": { "user": user },
    })
}

/// 데이터 없이 메시지만 담는 응답
pub fn message(message: &str) -> Value {
    json!({
        "status": SUCCESS,
        "message": message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope_counts_results() {
        let body = list(vec![json!({"name": "a"}), json!({"name": "b"})]);
        assert_eq!(body["status"], "success");
        assert_eq!(body["results"], 2);
        assert_eq!(body["data"]["data"][1]["name"], "b");
    }

    #[test]
    fn test_named_envelope() {
        let body = named("stats", json!([1, 2]));
        assert_eq!(body["data"]["stats"][0], 1);
    }

    #[test]
    fn test_token_envelope() {
        let body = with_token("abc", json!({"name": "Jonas"}));
        assert_eq!(body["token"], "abc");
        assert_eq!(body["data"]["user"]["name"], "Jonas");
    }
}
