//! # 메일 발송 서비스
//!
//! `EMAIL_HOST:EMAIL_PORT` SMTP 서버로 평문 메일을 전송합니다 (STARTTLS + 계정 인증).
//! `EMAIL_HOST`가 없으면 실제 전송 대신 내용을 로그로 남깁니다 (로컬 개발용).

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use singleton_macro::service;

use crate::{
    config::EmailConfig,
    core::errors::{AppError, AppResult},
};

/// 전송할 메일 내용
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

fn parse_mailbox(address: &str) -> AppResult<Mailbox> {
    address
        .parse()
        .map_err(|e| AppError::ExternalServiceError(format!("잘못된 메일 주소 ({}): {}", address, e)))
}

impl EmailMessage {
    /// 비밀번호 재설정 안내 메일
    pub fn password_reset(from: &str, to: &str, reset_url: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: "Your password reset token (valid for 10 min)".to_string(),
            text: format!(
                "Forgot your password? Submit a PATCH request with your new password and passwordConfirm to: {}.\n\
                 If you didn't forget your password, please ignore this email!",
                reset_url
            ),
        }
    }

    /// SMTP로 보낼 `text/plain` 메시지
    pub fn to_mime(&self) -> AppResult<Message> {
        Message::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(&self.to)?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.text.clone())
            .map_err(|e| AppError::ExternalServiceError(format!("메일 생성 실패: {}", e)))
    }
}

fn smtp_transport(host: &str) -> AppResult<AsyncSmtpTransport<Tokio1Executor>> {
    let builder = if EmailConfig::starttls() {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::ExternalServiceError(format!("SMTP 설정 실패 ({}): {}", host, e)))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
    };

    Ok(builder
        .port(EmailConfig::port())
        .credentials(Credentials::new(EmailConfig::username(), EmailConfig::password()))
        .build())
}

#[service(name = "email")]
pub struct EmailService {
    // 외부 의존성 없음
}

impl EmailService {
    pub async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let Some(host) = EmailConfig::host() else {
            log::info!(
                "EMAIL_HOST 미설정, 메일 전송 생략 → to: {}, subject: {}\n{}",
                message.to,
                message.subject,
                message.text
            );
            return Ok(());
        };

        let mime = message.to_mime()?;
        smtp_transport(&host)?
            .send(mime)
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("메일 전송 실패 ({}): {}", host, e)))?;

        log::debug!("메일 전송 완료: {}", message.to);
        Ok(())
    }

    pub async fn send_password_reset(&self, to: &str, reset_url: &str) -> AppResult<()> {
        let message = EmailMessage::password_reset(&EmailConfig::from(), to, reset_url);
        self.send(&message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset_message(to: &str) -> EmailMessage {
        EmailMessage::password_reset(
            "Natours <noreply@natours.io>",
            to,
            "https://localhost:3000/api/v1/users/reset-password/abc",
        )
    }

    #[test]
    fn test_password_reset_message() {
        let message = reset_message("jonas@example.com");
        assert_eq!(message.to, "jonas@example.com");
        assert!(message.subject.starts_with("Your password reset token"));
        assert!(message.text.contains("/reset-password/abc"));
    }

    #[test]
    fn test_reset_message_renders_as_plain_text_mail() {
        let mime = reset_message("jonas@example.com").to_mime().unwrap();
        let raw = String::from_utf8(mime.formatted()).unwrap();

        assert!(raw.contains("noreply@natours.io"));
        assert!(raw.contains("To: jonas@example.com"));
        assert!(raw.contains("Subject: Your password reset token (valid for 10 min)"));
        assert!(raw.contains("Content-Type: text/plain"));
    }

    #[test]
    fn test_invalid_recipient_is_external_service_error() {
        match reset_message("not an address").to_mime() {
            Err(AppError::ExternalServiceError(msg)) => assert!(msg.contains("not an address")),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
