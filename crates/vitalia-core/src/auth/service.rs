//! Auth orchestrator composing the credential store, one-time-code engine,
//! token service, and mail channel.
//!
//! Signup state machine: Unregistered -> PendingVerification (after
//! create + code issue) -> Verified (after successful code verify, which
//! also mints the session token). Signin requires a password match *and*
//! an emailed second-factor code; only verifying that code mints a token.
//!
//! Generic over the repository/hasher/codec traits so the persistence and
//! crypto layers are swappable and mockable in tests.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use vitalia_types::auth::{CodeDelivery, CodePurpose, IssuedToken};
use vitalia_types::error::{AuthError, TokenError};
use vitalia_types::user::{ProfileUpdate, UserAccount, UserProfile};

use crate::auth::code::CodeService;
use crate::auth::password::PasswordHasher;
use crate::auth::repository::{CodeRepository, RevokedTokenRepository, UserRepository};
use crate::auth::token::{TokenCodec, TokenService};
use crate::email::Mailer;

/// A minted token together with the account it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: IssuedToken,
    pub user: UserAccount,
}

/// Orchestrates signup, verification, signin, logout, and profile flows.
pub struct AuthService<U, P, CR, TC, TR, M>
where
    U: UserRepository,
    P: PasswordHasher,
    CR: CodeRepository,
    TC: TokenCodec,
    TR: RevokedTokenRepository,
    M: Mailer,
{
    users: U,
    hasher: P,
    codes: CodeService<CR>,
    tokens: TokenService<TC, TR>,
    mailer: M,
}

impl<U, P, CR, TC, TR, M> AuthService<U, P, CR, TC, TR, M>
where
    U: UserRepository,
    P: PasswordHasher,
    CR: CodeRepository,
    TC: TokenCodec,
    TR: RevokedTokenRepository,
    M: Mailer,
{
    pub fn new(
        users: U,
        hasher: P,
        codes: CodeService<CR>,
        tokens: TokenService<TC, TR>,
        mailer: M,
    ) -> Self {
        Self {
            users,
            hasher,
            codes,
            tokens,
            mailer,
        }
    }

    /// Issue a code for (email, purpose) and hand it to the mail channel.
    ///
    /// Delivery failure does not invalidate the issued code; the caller is
    /// told so the user can be informed.
    async fn issue_and_send(
        &self,
        email: &str,
        purpose: CodePurpose,
        display_name: &str,
    ) -> Result<CodeDelivery, AuthError> {
        let code = self.codes.issue(email, purpose).await?;

        match self.mailer.send_code(email, purpose, &code, display_name).await {
            Ok(()) => Ok(CodeDelivery::Sent),
            Err(err) => {
                warn!(email = %email, %purpose, error = %err, "Verification email delivery failed");
                Ok(CodeDelivery::Failed(err.to_string()))
            }
        }
    }

    /// Create an account (unverified, active) and send a signup code.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<CodeDelivery, AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = UserAccount {
            id: Uuid::now_v7(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_verified: false,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
            profile: UserProfile::default(),
        };

        self.users.create(&user).await?;
        info!(email = %email, "New user created");

        self.issue_and_send(email, CodePurpose::Signup, first_name)
            .await
    }

    /// Consume a signup code, mark the account verified, and mint a token.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<AuthSession, AuthError> {
        self.codes.verify(email, code, CodePurpose::Signup).await?;

        if !self.users.mark_verified(email).await? {
            return Err(AuthError::UserNotFound);
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = self.tokens.mint(&user.email)?;
        self.users.update_last_login(&user.id).await?;
        info!(email = %email, "User email verified");

        Ok(AuthSession { token, user })
    }

    /// First factor of signin: credentials are checked before any code is
    /// issued. Invalid credentials, inactive, or unverified accounts
    /// short-circuit with no code sent.
    pub async fn signin(&self, email: &str, password: &str) -> Result<CodeDelivery, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }
        if !user.is_verified {
            return Err(AuthError::AccountNotVerified);
        }

        self.issue_and_send(email, CodePurpose::Signin, &user.first_name)
            .await
    }

    /// Second factor of signin: consume the emailed code and mint a token.
    pub async fn verify_signin(&self, email: &str, code: &str) -> Result<AuthSession, AuthError> {
        self.codes.verify(email, code, CodePurpose::Signin).await?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }

        let token = self.tokens.mint(&user.email)?;
        self.users.update_last_login(&user.id).await?;
        info!(email = %email, "User signed in");

        Ok(AuthSession { token, user })
    }

    /// Reissue and resend a code for an existing account.
    pub async fn resend_code(
        &self,
        email: &str,
        purpose: CodePurpose,
    ) -> Result<CodeDelivery, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.issue_and_send(email, purpose, &user.first_name).await
    }

    /// Revoke a session token. A structurally invalid or already expired
    /// token cannot be revoked -- there is nothing to blacklist.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        if !self.tokens.revoke(token).await? {
            return Err(AuthError::Token(TokenError::Invalid));
        }
        Ok(())
    }

    /// The authentication gate used by every protected route: validate the
    /// token (signature, expiry, revocation) and load its account.
    pub async fn authenticate(&self, token: &str) -> Result<UserAccount, AuthError> {
        let claims = self.tokens.validate(token).await?;

        self.users
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::Token(TokenError::Invalid))
    }

    /// Apply a partial profile update and return the refreshed account.
    pub async fn update_profile(
        &self,
        user_id: &Uuid,
        update: &ProfileUpdate,
    ) -> Result<UserAccount, AuthError> {
        Ok(self.users.update_profile(user_id, update).await?)
    }

    /// Change the password after re-checking the current one.
    pub async fn change_password(
        &self,
        user: &UserAccount,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        if !self.hasher.verify(current, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let hash = self.hasher.hash(new)?;
        self.users.update_password_hash(&user.id, &hash).await?;
        info!(email = %user.email, "Password changed");
        Ok(())
    }
}
