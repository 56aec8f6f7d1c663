//! Account service: sign-up, login and profile management.
//!
//! Password hashing runs on the blocking thread pool so request workers are
//! never stalled by the key derivation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AccountQuery, NewUser, PasswordHashError, PasswordHasher, TokenCodec,
    TokenError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthSession, Avatar, Error, LoginCredentials, PasswordDigest, ProfileUpdate, Registration,
    User, UserId,
};

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
const EMAIL_TAKEN_MESSAGE: &str = "Email already registered.";
const USER_NOT_FOUND_MESSAGE: &str = "User not found.";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail => Error::conflict(EMAIL_TAKEN_MESSAGE),
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    Error::internal(error.to_string())
}

/// Account use-cases over a user store, a password hasher and a token codec.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create the service.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    async fn hash_password(&self, password: &str) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, password: &str, digest: PasswordDigest) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &digest))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?
            .map_err(map_hash_error)
    }

    fn open_session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user).map_err(map_token_error)?;
        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<U, H, T> AccountCommand for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let password = self.hash_password(registration.password()).await?;
        let avatar = Avatar::random(&mut rand::thread_rng());
        let new_user = NewUser {
            name: registration.name().clone(),
            email: registration.email().clone(),
            password,
            phone: registration.phone().cloned(),
            avatar,
        };
        let user = self.users.create(&new_user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "account registered");
        self.open_session(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(stored) = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };
        let user_id = stored.user.id;
        if !self
            .verify_password(credentials.password(), stored.password)
            .await?
        {
            warn!(%user_id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }
        self.open_session(stored.user)
    }

    async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> Result<User, Error> {
        let updated = if update.is_empty() {
            self.users.find_by_id(user_id).await
        } else {
            self.users.update_profile(user_id, &update).await
        }
        .map_err(map_user_error)?;
        updated.ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))
    }
}

#[async_trait]
impl<U, H, T> AccountQuery for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    async fn profile(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
