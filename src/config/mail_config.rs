//! SMTP 메일 설정

use std::env;

/// SMTP 서버 접속 정보
///
/// ```bash
/// EMAIL_HOST=smtp.mailtrap.io
/// EMAIL_PORT=2525
/// EMAIL_USERNAME=...
/// EMAIL_PASSWORD=...
/// EMAIL_FROM="Natours <noreply@natours.io>"
/// EMAIL_STARTTLS=true   # false면 평문 연결 (로컬 MailHog 등)
/// ```
pub struct EmailConfig;

impl EmailConfig {
    /// SMTP 호스트. 설정되지 않으면 메일 전송 대신 로그만 남깁니다.
    pub fn host() -> Option<String> {
        env::var("EMAIL_HOST").ok().filter(|host| !host.trim().is_empty())
    }

    pub fn port() -> u16 {
        env::var("EMAIL_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(2525)
    }

    pub fn username() -> String {
        env::var("EMAIL_USERNAME").unwrap_or_default()
    }

    pub fn password() -> String {
        env::var("EMAIL_PASSWORD").unwrap_or_default()
    }

    pub fn from() -> String {
        env::var("EMAIL_FROM").unwrap_or_else(|_| "Natours <noreply@natours.io>".to_string())
    }

    pub fn starttls() -> bool {
        Self::parse_flag(env::var("EMAIL_STARTTLS").ok().as_deref())
    }

    fn parse_flag(raw: Option<&str>) -> bool {
        !matches!(
            raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("false" | "0" | "no" | "off")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starttls_defaults_to_enabled() {
        assert!(EmailConfig::parse_flag(None));
        assert!(EmailConfig::parse_flag(Some("true")));
        assert!(!EmailConfig::parse_flag(Some("false")));
        assert!(!EmailConfig::parse_flag(Some(" OFF ")));
    }
}
