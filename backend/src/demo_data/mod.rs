//! Startup wiring for demo data seeding.

mod startup;

pub use startup::{BUNDLED_FIXTURE, StartupSeedingError, load_fixture, seed_demo_data_on_startup};
