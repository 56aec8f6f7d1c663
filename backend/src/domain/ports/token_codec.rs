//! Port for issuing and verifying bearer tokens.

use crate::domain::{AccessToken, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token is malformed, has a bad signature, or has expired.
        Invalid { message: String } => "token rejected: {message}",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issues tokens for authenticated users and resolves tokens back to users.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Issue a token identifying `user`.
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError>;

    /// Resolve a presented token to the user it was issued for.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
