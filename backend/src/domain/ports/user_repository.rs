//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{
    Avatar, EmailAddress, PasswordDigest, PhoneNumber, ProfileUpdate, User, UserId, UserName,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email address is already registered.
        DuplicateEmail => "email already registered",
    }
}

/// Account fields written at registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: PasswordDigest,
    pub phone: Option<PhoneNumber>,
    pub avatar: Avatar,
}

/// A user together with the stored password hash, used for login only.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub user: User,
    pub password: PasswordDigest,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; fails with `DuplicateEmail` when the address is taken.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user and password hash by email address.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Apply a partial profile update and return the updated user.
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;
}
