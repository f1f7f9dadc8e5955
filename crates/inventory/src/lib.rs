//! Inventory and weight-profile sources.
//!
//! The recommender only depends on the two traits here. `JsonFileStore`
//! reads the flat-file store on every lookup; `MemoryInventory` and
//! `StaticWeights` serve fixed data for tests and embedding callers.

pub mod file_store;
pub mod memory;

use async_trait::async_trait;
use common::{FlightRecord, HotelRecord, Result, WeightDocument};

pub use file_store::{JsonFileStore, JsonWeightFile};
pub use memory::{MemoryInventory, StaticWeights};

/// Supplies unscored flight and hotel records.
///
/// Either lookup may return an empty batch; deciding what that means is
/// the caller's job.
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Flights whose origin and destination codes match exactly.
    async fn lookup_flights(&self, origin: &str, destination: &str) -> Result<Vec<FlightRecord>>;

    /// Hotels whose address names `city`.
    async fn lookup_hotels(&self, city: &str) -> Result<Vec<HotelRecord>>;
}

/// Supplies the current weight document.
#[async_trait]
pub trait WeightSource: Send + Sync {
    async fn load_weights(&self) -> Result<WeightDocument>;
}

pub(crate) fn flight_matches(flight: &FlightRecord, origin: &str, destination: &str) -> bool {
    flight.origin == origin && flight.destination == destination
}

pub(crate) fn hotel_matches(hotel: &HotelRecord, city: &str) -> bool {
    hotel.city() == Some(city)
}
