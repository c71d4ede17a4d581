//! Mail delivery port and verification-email content.
//!
//! Delivery itself is an external collaborator: the `LogMailer` development
//! adapter lives in vitalia-infra, and a production adapter would wrap an
//! outbound provider. A delivery failure never rolls back code issuance.

pub mod content;

use vitalia_types::auth::CodePurpose;
use vitalia_types::error::MailerError;

/// Abstraction over the outbound verification-email channel.
pub trait Mailer: Send + Sync {
    /// Deliver a verification code to the given address.
    fn send_code(
        &self,
        to: &str,
        purpose: CodePurpose,
        code: &str,
        display_name: &str,
    ) -> impl std::future::Future<Output = Result<(), MailerError>> + Send;
}
