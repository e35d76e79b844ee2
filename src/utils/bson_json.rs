//! BSON → JSON 변환
//!
//! 응답 JSON에서 ObjectId는 hex 문자열, DateTime은 RFC 3339 문자열로 내보냅니다.
//! 최상위 문서에는 `_id`와 같은 값의 `id` 필드를 추가합니다.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Number, Value};

pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(date) => date
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(date.timestamp_millis())),
        Bson::Document(doc) => Value::Object(
            doc.iter()
                .map(|(key, value)| (key.clone(), bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(n) => Value::from(*n),
        Bson::Int64(n) => Value::from(*n),
        Bson::Double(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.clone().into_relaxed_extjson(),
    }
}

/// 숨김 필드를 제외하고 JSON 객체로 변환합니다.
pub fn document_to_json(doc: &Document, hidden: &[&str]) -> Value {
    let mut map: Map<String, Value> = doc
        .iter()
        .filter(|(key, _)| !hidden.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), bson_to_json(value)))
        .collect();

    if let Ok(id) = doc.get_object_id("_id") {
        map.entry("id").or_insert_with(|| Value::String(id.to_hex()));
    }
    Value::Object(map)
}

pub fn documents_to_json(docs: &[Document], hidden: &[&str]) -> Vec<Value> {
    docs.iter().map(|doc| document_to_json(doc, hidden)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId, DateTime};

    #[test]
    fn test_document_to_json_converts_special_types() {
        let id = ObjectId::new();
        let guide = ObjectId::new();
        let doc = doc! {
            "_id": id,
            "name": "The Forest Hiker",
            "price": 397.0,
            "createdAt": DateTime::from_millis(0),
            "guides": [guide],
            "password": "$2b$hash",
        };

        let json = document_to_json(&doc, &["password"]);
        assert_eq!(json["_id"], id.to_hex());
        assert_eq!(json["id"], id.to_hex());
        assert_eq!(json["price"], 397.0);
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(json["guides"][0], guide.to_hex());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_nested_documents_keep_their_ids() {
        let user = ObjectId::new();
        let doc = doc! { "review": "Great", "user": { "_id": user, "name": "Jonas" } };

        let json = document_to_json(&doc, &[]);
        assert_eq!(json["user"]["_id"], user.to_hex());
        assert!(json.get("id").is_none());
    }
}
