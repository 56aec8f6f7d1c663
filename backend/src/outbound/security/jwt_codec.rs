//! HS256 bearer tokens via `jsonwebtoken`.
//!
//! Expiry is checked against the injected [`Clock`] rather than the system
//! time so that token lifetimes can be tested deterministically.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::ports::{TokenCodec, TokenError};
use crate::domain::{AccessToken, User, UserId};

/// Claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed tokens for authenticated users.
#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtCodec {
    /// Build a codec signing with `secret`; tokens stay valid for `ttl`.
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use chrono::TimeDelta;
    /// use mockable::DefaultClock;
    /// use rideshare::outbound::security::JwtCodec;
    ///
    /// let codec = JwtCodec::new(b"change-me", TimeDelta::days(7), Arc::new(DefaultClock));
    /// # let _ = codec;
    /// ```
    #[must_use]
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenCodec for JwtCodec {
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError> {
        let issued_at = self.clock.utc();
        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        if data.claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::invalid("token expired"));
        }
        data.claims
            .sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|err| TokenError::invalid(format!("subject is not a user id: {err}")))
    }
}

/// Short, non-reversible fingerprint of a signing secret for startup logs.
///
/// ```
/// use rideshare::outbound::security::secret_fingerprint;
///
/// assert_eq!(secret_fingerprint(b"secret").len(), 16);
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(digest.get(..8).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
    use rstest::{fixture, rstest};

    use crate::domain::{Avatar, EmailAddress, UserName};

    const SECRET: &[u8] = b"test-secret";

    struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }

    fn at(hour: u32) -> Arc<dyn Clock> {
        let utc_now = Utc
            .with_ymd_and_hms(2026, 3, 1, hour, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        Arc::new(FixtureClock { utc_now })
    }

    fn codec(clock: Arc<dyn Clock>) -> JwtCodec {
        JwtCodec::new(SECRET, TimeDelta::hours(2), clock)
    }

    #[fixture]
    fn user() -> User {
        User {
            id: UserId::new(42),
            name: UserName::new("Sarah Chen").expect("valid name"),
            email: EmailAddress::new("sarah@example.com").expect("valid email"),
            phone: None,
            avatar: Avatar::default(),
            rating: 5.0,
            trips_count: 0,
            created_at: NaiveDate::from_ymd_opt(2026, 3, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("valid timestamp"),
        }
    }

    #[rstest]
    fn issued_tokens_resolve_to_their_user(user: User) {
        let token = codec(at(9)).issue(&user).expect("issue");

        assert_eq!(codec(at(10)).verify(token.as_str()), Ok(UserId::new(42)));
    }

    #[rstest]
    fn tokens_expire_after_the_ttl(user: User) {
        let token = codec(at(9)).issue(&user).expect("issue");

        let error = codec(at(11)).verify(token.as_str()).expect_err("expired");

        assert_eq!(error, TokenError::invalid("token expired"));
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_rejected(user: User) {
        let foreign = JwtCodec::new(b"other-secret", TimeDelta::hours(2), at(9));
        let token = foreign.issue(&user).expect("issue");

        assert!(matches!(
            codec(at(9)).verify(token.as_str()),
            Err(TokenError::Invalid { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.token")]
    fn garbage_is_rejected(#[case] token: &str) {
        assert!(codec(at(9)).verify(token).is_err());
    }

    #[rstest]
    fn fingerprints_are_stable_and_distinct() {
        assert_eq!(secret_fingerprint(SECRET), secret_fingerprint(SECRET));
        assert_ne!(secret_fingerprint(SECRET), secret_fingerprint(b"other"));
    }
}
