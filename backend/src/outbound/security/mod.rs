//! Credential adapters: password hashing and bearer tokens.

mod argon2_hasher;
mod jwt_codec;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_codec::{JwtCodec, secret_fingerprint};
