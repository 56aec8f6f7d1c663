//! Authentication primitives: credentials, registrations, and tokens.
//!
//! Inbound adapters turn raw request fields into these types before talking
//! to a port, so services only ever see validated input.

use zeroize::Zeroizing;

use super::user::{EmailAddress, PhoneNumber, User, UserName, UserValidationError};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// A required field was missing or blank.
    #[error("{field} is required")]
    MissingField { field: &'static str },
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    /// A user field failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

impl CredentialsValidationError {
    /// Name of the request field the failure relates to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => *field,
            Self::PasswordTooShort { .. } => "password",
            Self::User(
                UserValidationError::EmptyName | UserValidationError::NameTooLong { .. },
            ) => "name",
            Self::User(UserValidationError::EmptyEmail | UserValidationError::InvalidEmail) => {
                "email"
            }
            Self::User(
                UserValidationError::EmptyPhone | UserValidationError::PhoneTooLong { .. },
            ) => "phone",
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use rideshare::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Alex@Example.com", "password123").unwrap();
/// assert_eq!(creds.email().as_str(), "alex@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        if email.trim().is_empty() {
            return Err(CredentialsValidationError::MissingField { field: "email" });
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::MissingField { field: "password" });
        }
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
    phone: Option<PhoneNumber>,
}

impl Registration {
    /// Validate raw sign-up fields.
    ///
    /// Name, email and password are required; phone is optional.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<Self, CredentialsValidationError> {
        for (field, value) in [("name", name), ("email", email), ("password", password)] {
            if value.trim().is_empty() {
                return Err(CredentialsValidationError::MissingField { field });
            }
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
            phone: PhoneNumber::parse_optional(phone)?,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }
}

/// Stored password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Signed bearer token handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: AccessToken,
    pub user: User,
}
