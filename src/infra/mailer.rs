//! Outbound mail.
//!
//! This process renders messages but does not deliver them. `LogMailer`
//! records the envelope of each message; bodies carry reset tokens and are
//! never written to the log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl EmailJob {
    /// Reset link mail; the link targets the client's reset page.
    pub fn password_reset(to: &str, frontend_url: &str, token: &str) -> Self {
        let link = format!("{}/reset-password/{}", frontend_url.trim_end_matches('/'), token);
        Self {
            to: to.to_string(),
            subject: "Grand Regency Password Reset Request".to_string(),
            html: format!(
                "<p>You can click the link and update your password:</p>\
                 <p><a href=\"{link}\" target=\"_blank\">{token}</a></p>\
                 <p>This link will expire in 5 minutes.</p>\
                 <p>GrandRegency</p>"
            ),
        }
    }

    /// Confirmation after a password change.
    pub fn password_changed(to: &str, at: DateTime<Utc>) -> Self {
        Self {
            to: to.to_string(),
            subject: "Grand Regency Password Reset Successful".to_string(),
            html: format!(
                "<h2>Password Reset Successful</h2>\
                 <p>Your password for your Grand Regency account has been successfully updated.</p>\
                 <p>You can now log in using your new password.</p>\
                 <p>Reset on: <strong>{}</strong></p>",
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, job: EmailJob) -> AppResult<()>;
}

/// Mailer that records each message's envelope through `tracing`.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mail_from.clone())
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, job: EmailJob) -> AppResult<()> {
        tracing::warn!(
            from = %self.from,
            to = %job.to,
            subject = %job.subject,
            "Mail delivery is not configured; message not sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_reset_mail_links_to_client() {
        let job = EmailJob::password_reset("a@b.com", "https://desk.example/", "abc.def");
        assert!(job
            .html
            .contains("href=\"https://desk.example/reset-password/abc.def\""));
        assert!(job.html.contains("expire in 5 minutes"));
        assert_eq!(job.to, "a@b.com");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_log_mailer_keeps_reset_link_out_of_logs() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mailer = LogMailer::new("noreply@example.com");
        let job = EmailJob::password_reset("a@b.com", "https://desk.example", "secret.reset.token");
        mailer.send(job).await.unwrap();

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("a@b.com"));
        assert!(logged.contains("Password Reset Request"));
        assert!(!logged.contains("secret.reset.token"));
        assert!(!logged.contains("reset-password"));
    }
}
