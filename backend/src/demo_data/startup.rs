//! Startup seeding orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::SeedingResult;
use crate::domain::{DemoDataSeedOutcome, DemoDataSeeder, DemoDataSeedingError, DemoFixture};
use crate::outbound::persistence::{DbPool, DieselDemoDataSeedRepository};
use crate::outbound::security::Argon2PasswordHasher;
use crate::settings::AppSettings;

/// Fixture compiled into the binary.
pub const BUNDLED_FIXTURE: &str = include_str!("../../fixtures/demo-data.json");

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Fixture override could not be read.
    #[error("failed to read demo fixture at {path}: {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Fixture is not valid JSON for [`DemoFixture`].
    #[error("demo fixture parse error: {0}")]
    FixtureParse(#[from] serde_json::Error),
    /// Validation or persistence failed.
    #[error("demo data seeding error: {0}")]
    Seeding(#[from] DemoDataSeedingError),
}

/// Seed demo users and rides when enabled and the store is empty.
///
/// # Examples
///
/// ```rust,no_run
/// use rideshare::demo_data::seed_demo_data_on_startup;
/// use rideshare::outbound::persistence::{DbPool, PoolConfig};
/// use rideshare::settings::AppSettings;
///
/// # async fn run(settings: AppSettings) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new(settings.database_path())).await?;
/// if let Some(outcome) = seed_demo_data_on_startup(&settings, &pool).await? {
///     println!("seeded {} rides", outcome.ride_count);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn seed_demo_data_on_startup(
    settings: &AppSettings,
    db_pool: &DbPool,
) -> Result<Option<DemoDataSeedOutcome>, StartupSeedingError> {
    if !settings.demo_data {
        info!(reason = "disabled", "demo data seeding skipped");
        return Ok(None);
    }

    let fixture = load_fixture(settings.demo_data_path.as_deref())?;
    let seeder = DemoDataSeeder::new(
        Arc::new(DieselDemoDataSeedRepository::new(db_pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
    );
    let outcome = seeder.seed(&fixture).await?;

    match outcome.result {
        SeedingResult::Applied => info!(
            user_count = outcome.user_count,
            ride_count = outcome.ride_count,
            "demo data seeding applied"
        ),
        SeedingResult::AlreadySeeded => {
            info!("store already has users; demo data seeding skipped")
        }
    }

    Ok(Some(outcome))
}

/// Parse the demo fixture from `path`, or the bundled fixture when `None`.
///
/// # Errors
///
/// Returns [`StartupSeedingError`] when the file cannot be read or parsed.
pub fn load_fixture(path: Option<&Path>) -> Result<DemoFixture, StartupSeedingError> {
    let contents = match path {
        Some(path) => read_override(path)?,
        None => BUNDLED_FIXTURE.to_owned(),
    };
    Ok(serde_json::from_str(&contents)?)
}

fn read_override(path: &Path) -> Result<String, StartupSeedingError> {
    let read_error = |source| StartupSeedingError::FixtureRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "fixture path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(Path::new(file_name)).map_err(read_error)
}
