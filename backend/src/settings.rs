//! Application settings loaded via OrthoConfig.
//!
//! Values are merged from CLI flags, `RIDESHARE_*` environment variables and
//! configuration files. Accessors supply defaults for anything left unset.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATABASE_PATH: &str = "rideshare.db";
const DEFAULT_POOL_MAX_SIZE: u32 = 8;
const DEFAULT_TOKEN_TTL_HOURS: u32 = 168;
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Errors raised while interpreting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("pool size must be at least 1")]
    EmptyPool,
    #[error("token lifetime must be at least one hour")]
    ZeroTokenTtl,
    /// Release builds refuse to start without a configured signing secret.
    #[error("RIDESHARE_JWT_SECRET is not set and ephemeral secrets are not allowed")]
    MissingJwtSecret,
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RIDESHARE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// SQLite database file.
    pub database_path: Option<String>,
    pub pool_max_size: Option<u32>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Generate a throwaway signing secret when none is configured.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    pub token_ttl_hours: Option<u32>,
    /// Seed demo users and rides into an empty store on startup.
    #[ortho_config(default = false)]
    pub demo_data: bool,
    /// Demo fixture file used instead of the bundled one.
    pub demo_data_path: Option<PathBuf>,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    #[must_use]
    pub fn database_path(&self) -> &str {
        self.database_path
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_PATH)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::EmptyPool`] for a zero pool size.
    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        match self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTokenTtl`] for a zero lifetime.
    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        match self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS) {
            0 => Err(SettingsError::ZeroTokenTtl),
            hours => Ok(TimeDelta::hours(i64::from(hours))),
        }
    }

    /// Signing secret for bearer tokens.
    ///
    /// Debug builds, or runs with `allow_ephemeral_secret`, fall back to a
    /// random secret that dies with the process.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingJwtSecret`] when no secret is
    /// configured and an ephemeral one is not permitted.
    pub fn jwt_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        self.resolve_secret(cfg!(debug_assertions))
    }

    fn resolve_secret(&self, debug_build: bool) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.jwt_secret.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(secret) => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            None if debug_build || self.allow_ephemeral_secret => {
                warn!("using ephemeral JWT secret; tokens will not survive a restart");
                let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
                rand::thread_rng().fill_bytes(secret.as_mut_slice());
                Ok(secret)
            }
            None => Err(SettingsError::MissingJwtSecret),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "RIDESHARE_BIND_ADDR",
        "RIDESHARE_DATABASE_PATH",
        "RIDESHARE_POOL_MAX_SIZE",
        "RIDESHARE_JWT_SECRET",
        "RIDESHARE_ALLOW_EPHEMERAL_SECRET",
        "RIDESHARE_TOKEN_TTL_HOURS",
        "RIDESHARE_DEMO_DATA",
        "RIDESHARE_DEMO_DATA_PATH",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("rideshare")]).expect("config should load")
    }

    fn cleared_env() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    fn with_overrides(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        let mut vars = cleared_env();
        for (name, value) in overrides {
            if let Some(slot) = vars.iter_mut().find(|(var, _)| var == name) {
                slot.1 = Some((*value).to_owned());
            }
        }
        vars
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(cleared_env());

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:3000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.database_path(), "rideshare.db");
        assert_eq!(settings.pool_max_size().expect("default size"), 8);
        assert_eq!(settings.token_ttl().expect("default ttl"), TimeDelta::days(7));
        assert!(!settings.demo_data);
        assert!(settings.demo_data_path.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(with_overrides(&[
            ("RIDESHARE_BIND_ADDR", "127.0.0.1:8080"),
            ("RIDESHARE_DATABASE_PATH", "/tmp/rides.db"),
            ("RIDESHARE_POOL_MAX_SIZE", "2"),
            ("RIDESHARE_TOKEN_TTL_HOURS", "1"),
            ("RIDESHARE_DEMO_DATA", "true"),
            ("RIDESHARE_DEMO_DATA_PATH", "/tmp/demo.json"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:8080".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.database_path(), "/tmp/rides.db");
        assert_eq!(settings.pool_max_size().expect("size"), 2);
        assert_eq!(settings.token_ttl().expect("ttl"), TimeDelta::hours(1));
        assert!(settings.demo_data);
        assert_eq!(settings.demo_data_path, Some(PathBuf::from("/tmp/demo.json")));
    }

    #[rstest]
    #[case("RIDESHARE_BIND_ADDR", "not-an-address")]
    #[case("RIDESHARE_POOL_MAX_SIZE", "0")]
    #[case("RIDESHARE_TOKEN_TTL_HOURS", "0")]
    fn nonsensical_values_are_rejected(#[case] var: &'static str, #[case] value: &str) {
        let _guard = lock_env(with_overrides(&[(var, value)]));

        let settings = load_from_empty_args();

        let failed = settings.bind_addr().is_err()
            || settings.pool_max_size().is_err()
            || settings.token_ttl().is_err();
        assert!(failed, "{var}={value} should be rejected");
    }

    #[rstest]
    fn configured_secret_is_used_verbatim() {
        let _guard = lock_env(with_overrides(&[("RIDESHARE_JWT_SECRET", "s3cret")]));

        let secret = load_from_empty_args()
            .resolve_secret(false)
            .expect("configured secret");

        assert_eq!(secret.as_slice(), b"s3cret");
    }

    #[rstest]
    #[case(false, None, false)]
    #[case(true, None, true)]
    #[case(false, Some("true"), true)]
    fn missing_secret_needs_debug_or_opt_in(
        #[case] debug_build: bool,
        #[case] allow: Option<&str>,
        #[case] expect_secret: bool,
    ) {
        let overrides: Vec<_> = allow
            .map(|value| ("RIDESHARE_ALLOW_EPHEMERAL_SECRET", value))
            .into_iter()
            .collect();
        let _guard = lock_env(with_overrides(&overrides));

        let result = load_from_empty_args().resolve_secret(debug_build);

        match result {
            Ok(secret) => {
                assert!(expect_secret, "secret should have been refused");
                assert_eq!(secret.len(), EPHEMERAL_SECRET_LEN);
            }
            Err(err) => {
                assert!(!expect_secret, "unexpected error: {err}");
                assert!(matches!(err, SettingsError::MissingJwtSecret));
            }
        }
    }
}
