pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod flight_repo;
pub mod memory_repo;

pub use booking_repo::PostgresBookingRepository;
pub use database::DbClient;
pub use flight_repo::PostgresFlightRepository;
pub use memory_repo::MemoryStore;

use app_config::{DatabaseConfig, StorageBackend};
use seatline_core::{BookingRepository, FlightRepository};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum StorageInitError {
    #[error("database.url is required for the postgres backend")]
    MissingUrl,
    #[error("Failed to connect to Postgres: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// The process-wide storage handle, opened once at startup.
#[derive(Clone)]
pub struct Storage {
    pub flights: Arc<dyn FlightRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    db: Option<DbClient>,
}

impl Storage {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            flights: store.clone(),
            bookings: store,
            db: None,
        }
    }

    pub async fn open(config: &DatabaseConfig) -> Result<Self, StorageInitError> {
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => {
                let url = config.url.as_deref().ok_or(StorageInitError::MissingUrl)?;
                let db = DbClient::new(url, config).await?;
                db.migrate().await?;
                info!("Connected to Postgres");
                Ok(Self {
                    flights: Arc::new(PostgresFlightRepository::new(db.pool.clone())),
                    bookings: Arc::new(PostgresBookingRepository::new(db.pool.clone())),
                    db: Some(db),
                })
            }
        }
    }

    pub async fn close(&self) {
        if let Some(db) = &self.db {
            db.close().await;
            info!("Database connections closed");
        }
    }
}
