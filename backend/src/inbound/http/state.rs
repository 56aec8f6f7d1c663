//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `web::Data` and only ever talk to domain
//! ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, BookingCommand, BookingQuery, ReviewCommand, RideCommand,
    RideQuery, TokenCodec,
};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub account_query: Arc<dyn AccountQuery>,
    pub rides: Arc<dyn RideCommand>,
    pub ride_query: Arc<dyn RideQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub booking_query: Arc<dyn BookingQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    /// Resolves bearer tokens for [`super::auth::AuthenticatedUser`].
    pub tokens: Arc<dyn TokenCodec>,
}
