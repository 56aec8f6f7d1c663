//! Driving port for reading account data.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Profile of the given user.
    async fn profile(&self, user_id: UserId) -> Result<User, Error>;
}
