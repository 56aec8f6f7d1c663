//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need a signed-in caller take an [`AuthenticatedUser`]
//! argument; the extractor reads `Authorization: Bearer <token>` and resolves
//! it through the [`TokenCodec`](crate::domain::ports::TokenCodec) held in
//! [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, UserId};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Message returned when no bearer token accompanies a protected request.
pub const MISSING_TOKEN_MESSAGE: &str = "Access denied. No token provided.";
/// Message returned when the bearer token does not verify.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token.";

/// The caller identified by a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    #[must_use]
    pub const fn id(self) -> UserId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized(MISSING_TOKEN_MESSAGE))?;
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    state
        .tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::unauthorized(INVALID_TOKEN_MESSAGE)
        })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
