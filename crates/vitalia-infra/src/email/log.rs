//! Mailer that writes messages to the log instead of sending them.
//!
//! This is the development delivery channel: the rendered subject and body
//! go to stdout via `tracing` so the code can be read off the server log.
//! An SMTP-backed implementation slots in behind the same trait.

use tracing::info;

use vitalia_core::email::{content, Mailer};
use vitalia_types::auth::CodePurpose;
use vitalia_types::error::MailerError;

/// Log-backed `Mailer`.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Mailer for LogMailer {
    async fn send_code(
        &self,
        to: &str,
        purpose: CodePurpose,
        code: &str,
        display_name: &str,
    ) -> Result<(), MailerError> {
        let subject = content::subject(purpose);
        let body = content::body(purpose, code, display_name);

        info!(to = %to, %purpose, subject = %subject, "Would send email:\n{body}");
        Ok(())
    }
}
