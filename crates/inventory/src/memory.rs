//! In-memory inventory and weights.

use async_trait::async_trait;
use common::{FlightRecord, HotelRecord, Result, WeightDocument};
use tokio::sync::RwLock;

use crate::{flight_matches, hotel_matches, InventoryProvider, WeightSource};

/// Inventory held in memory. Contents can be swapped at runtime, which
/// the next cache refresh will observe.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    flights: RwLock<Vec<FlightRecord>>,
    hotels: RwLock<Vec<HotelRecord>>,
}

impl MemoryInventory {
    pub fn new(flights: Vec<FlightRecord>, hotels: Vec<HotelRecord>) -> Self {
        Self {
            flights: RwLock::new(flights),
            hotels: RwLock::new(hotels),
        }
    }

    pub async fn replace_flights(&self, flights: Vec<FlightRecord>) {
        *self.flights.write().await = flights;
    }

    pub async fn replace_hotels(&self, hotels: Vec<HotelRecord>) {
        *self.hotels.write().await = hotels;
    }
}

#[async_trait]
impl InventoryProvider for MemoryInventory {
    async fn lookup_flights(&self, origin: &str, destination: &str) -> Result<Vec<FlightRecord>> {
        let flights = self.flights.read().await;
        Ok(flights
            .iter()
            .filter(|f| flight_matches(f, origin, destination))
            .cloned()
            .collect())
    }

    async fn lookup_hotels(&self, city: &str) -> Result<Vec<HotelRecord>> {
        let hotels = self.hotels.read().await;
        Ok(hotels.iter().filter(|h| hotel_matches(h, city)).cloned().collect())
    }
}

/// A fixed weight document.
#[derive(Debug, Clone)]
pub struct StaticWeights(pub WeightDocument);

#[async_trait]
impl WeightSource for StaticWeights {
    async fn load_weights(&self) -> Result<WeightDocument> {
        self.0.validate()?;
        Ok(self.0)
    }
}
