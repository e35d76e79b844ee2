//! # 문자열 유틸리티
//!
//! 요청 DTO 역직렬화와 슬러그 생성에 쓰이는 문자열 처리 함수들입니다.

use serde::Deserialize;

/// 공백을 제거하고, 비어 있으면 `None`을 반환합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// `Option<String>` 필드용 serde 역직렬화 함수 (trim + 빈 문자열은 None)
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// `String` 필드용 serde 역직렬화 함수 (앞뒤 공백 제거)
pub fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// 이메일은 소문자로 정규화해서 저장/조회합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 투어 이름에서 URL 슬러그를 만듭니다.
///
/// `"The Forest Hiker"` → `"the-forest-hiker"`
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for ch in value.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("Hello".to_string())), Some("Hello".to_string()));
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_helpers() {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(deserialize_with = "deserialize_trimmed_string")]
            name: String,
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            description: Option<String>,
        }

        let payload: Payload =
            serde_json::from_str(r#"{"name": "  The Sea Explorer ", "description": "  "}"#).unwrap();
        assert_eq!(payload.name, "The Sea Explorer");
        assert_eq!(payload.description, None);

        let payload: Payload = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(payload.description, None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("The Forest Hiker"), "the-forest-hiker");
        assert_eq!(slugify("  The Snow   Adventurer! "), "the-snow-adventurer");
        assert_eq!(slugify("Sea & Sun -- 2025"), "sea-sun-2025");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Natours.IO "), "admin@natours.io");
    }
}
