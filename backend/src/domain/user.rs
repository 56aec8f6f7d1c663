//! User accounts: identity, contact details, and reputation.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("phone number must not be empty")]
    EmptyPhone,
    #[error("phone number must be at most {max} characters")]
    PhoneTooLong { max: usize },
}

/// Stable user identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier as stored.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum length of a user's name.
pub const USER_NAME_MAX: usize = 80;
/// Maximum length of a phone number.
pub const PHONE_MAX: usize = 32;

/// Name shown to other riders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Trim and validate a user name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login identity, normalised to lower case.
///
/// # Examples
/// ```
/// use rideshare::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Alex@Example.com ").unwrap();
/// assert_eq!(email.as_str(), "alex@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact number shared with the other party of a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Trim and validate a phone number.
    pub fn new(phone: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = phone.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyPhone);
        }
        if trimmed.chars().count() > PHONE_MAX {
            return Err(UserValidationError::PhoneTooLong { max: PHONE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Parse an optional phone field, treating blank input as absent.
    pub fn parse_optional(
        phone: Option<&str>,
    ) -> Result<Option<Self>, UserValidationError> {
        match phone.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::new(value).map(Some),
        }
    }

    /// Borrow the number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Avatar used when none was chosen.
pub const DEFAULT_AVATAR: &str = "🧑";
/// Emoji avatars handed out at registration.
pub const AVATARS: [&str; 6] = ["🧑", "👩", "👨", "🧔", "👱", "🧑‍💼"];

/// Avatar shown next to a user's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar(String);

impl Avatar {
    /// Wrap a stored avatar value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Pick one of [`AVATARS`] at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let choice = AVATARS.choose(rng).copied().unwrap_or(DEFAULT_AVATAR);
        Self(choice.to_owned())
    }

    /// Borrow the avatar value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self(DEFAULT_AVATAR.to_owned())
    }
}

/// Public view of a registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub avatar: Avatar,
    /// Average review score, starting at 5.0.
    pub rating: f64,
    /// Number of bookings the user took part in, as driver or passenger.
    pub trips_count: u32,
    pub created_at: NaiveDateTime,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<UserName>,
    pub phone: Option<PhoneNumber>,
}

impl ProfileUpdate {
    /// Validate raw optional inputs into an update.
    pub fn try_from_parts(
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let name = name
            .filter(|value| !value.trim().is_empty())
            .map(UserName::new)
            .transpose()?;
        let phone = PhoneNumber::parse_optional(phone)?;
        Ok(Self { name, phone })
    }

    /// True when the update would not change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}
