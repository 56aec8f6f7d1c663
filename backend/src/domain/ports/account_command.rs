//! Driving port for account use-cases: sign-up, login and profile edits.
//!
//! Inbound adapters call this port with validated input and never see the
//! hashing or token infrastructure behind it.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, ProfileUpdate, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and sign it in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Change the caller's name and/or phone number.
    async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> Result<User, Error>;
}
