//! SQLite-backed `UserRepository` implementation using Diesel ORM.
//!
//! Emails are unique at the schema level; a unique violation on insert is
//! reported as `DuplicateEmail` so the caller can answer with a conflict.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUser, UserCredentials, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordDigest, ProfileUpdate, User, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserProfileChanges, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{RowError, user_from_row};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, |message| UserPersistenceError::connection(message))
}

/// Map Diesel errors to domain persistence errors.
fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_email()
        }
        other => map_basic_diesel_error(
            other,
            UserPersistenceError::query,
            UserPersistenceError::connection,
        ),
    }
}

fn map_row_error(error: RowError) -> UserPersistenceError {
    UserPersistenceError::query(error.to_string())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                name: user.name.as_str(),
                email: user.email.as_str(),
                password: user.password.as_str(),
                phone: user.phone.as_ref().map(|phone| phone.as_str()),
                avatar: user.avatar.as_str(),
                rating: 5.0,
                trips_count: 0,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        user_from_row(row).map_err(map_row_error)
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            let password = PasswordDigest::new(row.password.clone());
            user_from_row(row).map(|user| UserCredentials { user, password })
        })
        .transpose()
        .map_err(map_row_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_i64())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(user_from_row).transpose().map_err(map_row_error)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileChanges {
            name: update.name.as_ref().map(|name| name.as_str()),
            phone: update.phone.as_ref().map(|phone| phone.as_str()),
        };
        let row = diesel::update(users::table.find(id.as_i64()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(user_from_row).transpose().map_err(map_row_error)
    }
}
