pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod genres;
pub mod models;
pub mod seed;
pub mod utils;
pub mod views;

use chrono::Utc;
use log::info;

pub use config::{AppConfig, ConfigError, ConfigStore};
pub use db::{DeletePolicy, Store};
pub use error::{Result, StoreError};
pub use genres::Genres;
pub use models::{
    Artist, ArtistFields, CityStateGroup, Show, ShowDetails, ShowListing, ShowOwner,
    ShowPartition, Venue, VenueFields,
};

/// Opens the configured database, applying the configured delete policy and
/// seeding demo data into an empty store when enabled.
pub fn open_store(config: &AppConfig) -> Result<Store> {
    let path = config.database_path();
    info!("opening store at {}", path.display());
    let mut store = Store::open(&path)?.with_delete_policy(config.delete_policy);
    if config.seed_demo_data {
        seed::seed_if_empty(&mut store, Utc::now())?;
    }
    Ok(store)
}
