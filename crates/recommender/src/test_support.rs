//! Fixture builders shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveTime;
use common::{
    FlightRecord, FlightWeights, HotelRecord, HotelWeights, ProfileWeights, Result,
    WeightDocument,
};
use inventory::{InventoryProvider, MemoryInventory};

pub fn flight(
    origin: &str,
    destination: &str,
    price: f64,
    duration: f64,
    stops: usize,
    departs: &str,
    arrives: &str,
) -> FlightRecord {
    FlightRecord {
        origin: origin.into(),
        destination: destination.into(),
        stops: (0..stops).map(|i| format!("ST{}", i)).collect(),
        price,
        departure_time: NaiveTime::parse_from_str(departs, "%H:%M").unwrap(),
        arrival_time: NaiveTime::parse_from_str(arrives, "%H:%M").unwrap(),
        duration,
    }
}

pub fn hotel(
    name: &str,
    city: &str,
    stars: u8,
    rating: f64,
    amenities: usize,
    price_per_night: f64,
) -> HotelRecord {
    HotelRecord {
        name: name.into(),
        address: format!("1 Test Street, {}, Testland", city),
        stars,
        rating,
        amenities: (0..amenities).map(|i| format!("amenity-{}", i)).collect(),
        price_per_night,
    }
}

/// Weight document whose per-entity weights sum to 1 for every profile.
pub fn weights() -> WeightDocument {
    WeightDocument {
        balanced: ProfileWeights {
            flight: FlightWeights {
                price: 0.3,
                duration: 0.25,
                stops: 0.2,
                departure_time: 0.125,
                arrival_time: 0.125,
            },
            hotel: HotelWeights { price: 0.3, star: 0.25, rating: 0.3, amenities: 0.15 },
        },
        luxury: ProfileWeights {
            flight: FlightWeights {
                price: 0.1,
                duration: 0.3,
                stops: 0.3,
                departure_time: 0.15,
                arrival_time: 0.15,
            },
            hotel: HotelWeights { price: 0.05, star: 0.4, rating: 0.4, amenities: 0.15 },
        },
        affordable: ProfileWeights {
            flight: FlightWeights {
                price: 0.6,
                duration: 0.15,
                stops: 0.1,
                departure_time: 0.075,
                arrival_time: 0.075,
            },
            hotel: HotelWeights { price: 0.6, star: 0.1, rating: 0.2, amenities: 0.1 },
        },
    }
}

/// Round-trip inventory from JFK to LAX and LHR. Sydney has flights but
/// no hotels; Tokyo has nothing at all.
pub fn fixture_inventory() -> MemoryInventory {
    let flights = vec![
        flight("JFK", "LAX", 320.0, 6.0, 0, "11:30", "14:45"),
        flight("JFK", "LAX", 210.0, 9.0, 1, "06:15", "15:00"),
        flight("LAX", "JFK", 340.0, 5.5, 0, "13:00", "21:20"),
        flight("LAX", "JFK", 190.0, 8.5, 1, "22:30", "09:10"),
        flight("JFK", "LHR", 640.0, 7.0, 0, "18:30", "06:40"),
        flight("JFK", "LHR", 480.0, 11.0, 1, "09:45", "03:30"),
        flight("LHR", "JFK", 610.0, 8.0, 0, "11:00", "14:05"),
        flight("JFK", "SYD", 1450.0, 21.0, 1, "12:00", "08:00"),
        flight("SYD", "JFK", 1390.0, 20.0, 1, "14:00", "13:00"),
    ];
    let hotels = vec![
        hotel("Sunset Suites", "Los Angeles", 4, 8.6, 5, 260.0),
        hotel("Motel Blue", "Los Angeles", 2, 6.1, 2, 95.0),
        hotel("The Strand", "London", 5, 9.3, 6, 480.0),
        hotel("Kings Cross Inn", "London", 3, 7.2, 3, 150.0),
    ];
    MemoryInventory::new(flights, hotels)
}

/// Wraps a provider and counts lookups.
pub struct CountingProvider<P> {
    pub inner: P,
    pub flight_calls: AtomicUsize,
    pub hotel_calls: AtomicUsize,
    pub delay: Option<std::time::Duration>,
}

impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Arc<Self> {
        Arc::new(Self::with_delay(inner, None))
    }

    pub fn with_delay(inner: P, delay: Option<std::time::Duration>) -> Self {
        Self {
            inner,
            flight_calls: AtomicUsize::new(0),
            hotel_calls: AtomicUsize::new(0),
            delay,
        }
    }

    pub fn flight_calls(&self) -> usize {
        self.flight_calls.load(Ordering::SeqCst)
    }

    pub fn hotel_calls(&self) -> usize {
        self.hotel_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: InventoryProvider> InventoryProvider for CountingProvider<P> {
    async fn lookup_flights(&self, origin: &str, destination: &str) -> Result<Vec<FlightRecord>> {
        self.flight_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.lookup_flights(origin, destination).await
    }

    async fn lookup_hotels(&self, city: &str) -> Result<Vec<HotelRecord>> {
        self.hotel_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.lookup_hotels(city).await
    }
}
