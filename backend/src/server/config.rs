//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::TimeDelta;
use rideshare::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: TimeDelta,
}

impl ServerConfig {
    /// Construct a server configuration around an initialised pool.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, jwt_secret: Zeroizing<Vec<u8>>) -> Self {
        Self {
            bind_addr,
            db_pool,
            jwt_secret,
            token_ttl: TimeDelta::days(7),
        }
    }

    /// Override how long issued bearer tokens stay valid.
    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: TimeDelta) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
