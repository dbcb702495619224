use crate::config::{email::EmailConfig, validation::ValidationConfig};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;

/// Outcome of a best-effort email dispatch. Never an error: the caller
/// decides how a failed dispatch affects the user-facing result (typically
/// by downgrading the response to `partial`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailDispatch {
    Sent,
    Failed,
    /// SMTP not configured; dispatch intentionally skipped.
    Skipped,
}

impl EmailDispatch {
    /// Skipped counts as ok: an unconfigured dev environment is not a
    /// partial failure.
    pub fn is_ok(self) -> bool {
        !matches!(self, EmailDispatch::Failed)
    }
}

#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: Option<String>,
    base_url: String,
    dispatch_timeout: Duration,
}

impl EmailService {
    /// Build from environment variables. If SMTP is not configured, email
    /// sending is skipped (graceful degradation).
    pub fn from_env() -> Self {
        let dispatch_timeout = Duration::from_secs(ValidationConfig::from_env().email_timeout_secs);

        match EmailConfig::from_env() {
            Some(cfg) => {
                let creds = Credentials::new(cfg.smtp_username.clone(), cfg.smtp_password.clone());
                let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
                    .map(|builder| builder.port(cfg.smtp_port).credentials(creds).build());

                match transport {
                    Ok(t) => Self {
                        transport: Some(t),
                        from_address: Some(cfg.from_address),
                        base_url: cfg.base_url,
                        dispatch_timeout,
                    },
                    Err(e) => {
                        tracing::warn!("Failed to build SMTP transport: {e}");
                        Self {
                            transport: None,
                            from_address: None,
                            base_url: cfg.base_url,
                            dispatch_timeout,
                        }
                    }
                }
            }
            None => {
                let base_url =
                    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
                Self {
                    transport: None,
                    from_address: None,
                    base_url,
                    dispatch_timeout,
                }
            }
        }
    }

    /// Returns true if SMTP is configured and available.
    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    pub fn confirmation_link(&self, listing_id: i32, token: &str) -> String {
        format!(
            "{}/validare-anunt?id={}&token={}",
            self.base_url, listing_id, token
        )
    }

    /// Send the listing confirmation email. Fire-and-forget with respect to
    /// delivery: the send is bounded by the dispatch timeout and the result
    /// is reported, never thrown.
    pub async fn send_listing_validation_email(
        &self,
        to: &str,
        listing_title: &str,
        listing_id: i32,
        token: &str,
    ) -> EmailDispatch {
        let link = self.confirmation_link(listing_id, token);
        let body = format!(
            "<html><body>\
             <p>Anuntul tau <strong>{}</strong> a fost inregistrat.</p>\
             <p>Pentru a-l activa, confirma adresa de email:</p>\
             <p><a href=\"{}\">{}</a></p>\
             <p>Linkul expira in 48 de ore.</p>\
             </body></html>",
            listing_title, link, link
        );

        self.send_html(to, "Valideaza-ti anuntul", &body).await
    }

    async fn send_html(&self, to: &str, subject: &str, body: &str) -> EmailDispatch {
        let transport = match &self.transport {
            Some(t) => t,
            None => {
                tracing::debug!("SMTP not configured, skipping email to {to}");
                return EmailDispatch::Skipped;
            }
        };
        let from_address = match &self.from_address {
            Some(f) => f,
            None => return EmailDispatch::Skipped,
        };

        let from_mailbox: Mailbox = match from_address.parse() {
            Ok(m) => m,
            Err(e) => {
                tracing::error!("Invalid from address '{}': {}", from_address, e);
                return EmailDispatch::Failed;
            }
        };
        let to_mailbox: Mailbox = match to.parse() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Invalid recipient address '{}': {}", to, e);
                return EmailDispatch::Failed;
            }
        };

        let email = match Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
        {
            Ok(m) => m,
            Err(e) => {
                tracing::error!("Failed to build email: {}", e);
                return EmailDispatch::Failed;
            }
        };

        // Bounded wait: a slow SMTP relay must not hang the request.
        match tokio::time::timeout(self.dispatch_timeout, transport.send(email)).await {
            Ok(Ok(_)) => {
                tracing::info!("Email sent to {to}: {subject}");
                EmailDispatch::Sent
            }
            Ok(Err(e)) => {
                tracing::warn!("Email dispatch to {to} failed: {e}");
                EmailDispatch::Failed
            }
            Err(_) => {
                tracing::warn!(
                    "Email dispatch to {to} timed out after {:?}",
                    self.dispatch_timeout
                );
                EmailDispatch::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_dispatch_is_ok() {
        assert!(EmailDispatch::Skipped.is_ok());
        assert!(EmailDispatch::Sent.is_ok());
        assert!(!EmailDispatch::Failed.is_ok());
    }

    #[test]
    fn confirmation_link_shape() {
        let service = EmailService {
            transport: None,
            from_address: None,
            base_url: "https://piata.example".to_string(),
            dispatch_timeout: Duration::from_secs(10),
        };
        assert_eq!(
            service.confirmation_link(7, "abc123"),
            "https://piata.example/validare-anunt?id=7&token=abc123"
        );
    }
}
