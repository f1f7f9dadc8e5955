//! Flat-file JSON store.
//!
//! Files are re-read on every call so edits are picked up on the next
//! cache refresh without restarting.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use common::{Error, FlightRecord, HotelRecord, Result, WeightDocument};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{flight_matches, hotel_matches, InventoryProvider, WeightSource};

/// Reads flights and hotels from two JSON array files.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    flights_path: PathBuf,
    hotels_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(flights_path: impl Into<PathBuf>, hotels_path: impl Into<PathBuf>) -> Self {
        Self {
            flights_path: flights_path.into(),
            hotels_path: hotels_path.into(),
        }
    }
}

#[async_trait]
impl InventoryProvider for JsonFileStore {
    async fn lookup_flights(&self, origin: &str, destination: &str) -> Result<Vec<FlightRecord>> {
        let all: Vec<FlightRecord> = read_json(&self.flights_path).await?;
        let total = all.len();
        let matched: Vec<FlightRecord> = all
            .into_iter()
            .filter(|f| flight_matches(f, origin, destination))
            .collect();

        debug!(
            "{} -> {}: {} of {} flights matched",
            origin,
            destination,
            matched.len(),
            total
        );
        Ok(matched)
    }

    async fn lookup_hotels(&self, city: &str) -> Result<Vec<HotelRecord>> {
        let all: Vec<HotelRecord> = read_json(&self.hotels_path).await?;
        let total = all.len();
        let matched: Vec<HotelRecord> = all.into_iter().filter(|h| hotel_matches(h, city)).collect();

        debug!("{}: {} of {} hotels matched", city, matched.len(), total);
        Ok(matched)
    }
}

/// Reads the weight document from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonWeightFile {
    path: PathBuf,
}

impl JsonWeightFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WeightSource for JsonWeightFile {
    async fn load_weights(&self) -> Result<WeightDocument> {
        let doc: WeightDocument = read_json(&self.path).await?;
        doc.validate()?;
        Ok(doc)
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path.display().to_string(), e))?;

    serde_json::from_str(&raw).map_err(|e| Error::json(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FLIGHTS: &str = r#"[
        {"from": "JFK", "to": "LHR", "stops": [], "price": 540, "departure_time": "09:15",
         "arrival_time": "21:05", "duration": 7.0},
        {"from": "JFK", "to": "LHR", "stops": ["BOS"], "price": 410, "departure_time": "06:30",
         "arrival_time": "22:40", "duration": 11.0},
        {"from": "LHR", "to": "JFK", "stops": [], "price": 560, "departure_time": "12:00",
         "arrival_time": "15:00", "duration": 8.0}
    ]"#;

    const HOTELS: &str = r#"[
        {"name": "Savoy", "address": "Garden Street, London, United Kingdom", "stars": 5,
         "rating": 9.1, "amenities": ["wifi", "spa"], "price_per_night": 420},
        {"name": "Tokyo Inn", "address": "666 Sky Blvd, Tokyo, Japan", "stars": 3,
         "rating": 7.4, "amenities": ["wifi"], "price_per_night": 95}
    ]"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_lookup_filters_by_exact_route() {
        let flights = write_temp(FLIGHTS);
        let hotels = write_temp(HOTELS);
        let store = JsonFileStore::new(flights.path(), hotels.path());

        let out = store.lookup_flights("JFK", "LHR").await.unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|f| f.origin == "JFK" && f.destination == "LHR"));

        let none = store.lookup_flights("JFK", "SYD").await.unwrap();
        assert!(none.is_empty(), "Unknown route is an empty batch, not an error");
    }

    #[tokio::test]
    async fn test_lookup_hotels_matches_address_city() {
        let flights = write_temp(FLIGHTS);
        let hotels = write_temp(HOTELS);
        let store = JsonFileStore::new(flights.path(), hotels.path());

        let london = store.lookup_hotels("London").await.unwrap();
        assert_eq!(london.len(), 1);
        assert_eq!(london[0].name, "Savoy");
        assert!(store.lookup_hotels("Sydney").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error_with_path() {
        let store = JsonFileStore::new("/nonexistent/flights.json", "/nonexistent/hotels.json");
        let err = store.lookup_flights("JFK", "LHR").await.unwrap_err();
        assert!(
            matches!(err, Error::Io { ref path, .. } if path == "/nonexistent/flights.json"),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_malformed_file_is_json_error_with_path() {
        let flights = write_temp(FLIGHTS);
        let hotels = write_temp("[{\"name\": \"half a hotel\"");
        let store = JsonFileStore::new(flights.path(), hotels.path());

        let err = store.lookup_hotels("London").await.unwrap_err();
        let expected = hotels.path().display().to_string();
        assert!(
            matches!(err, Error::Json { ref context, .. } if *context == expected),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_weight_file_is_validated() {
        let doc = r#"{
            "balanced":   {"flight": {"price": 0.3, "duration": 0.2, "stops": 0.2, "departureTime": 0.15, "arrivalTime": 0.15},
                           "hotel":  {"price": 0.3, "star": 0.2, "rating": 0.3, "amenities": 0.2}},
            "luxury":     {"flight": {"price": 0.1, "duration": 0.3, "stops": 0.3, "departureTime": 0.15, "arrivalTime": 0.15},
                           "hotel":  {"price": 0.1, "star": 0.4, "rating": 0.3, "amenities": 0.2}},
            "affordable": {"flight": {"price": 0.6, "duration": 0.1, "stops": 0.1, "departureTime": 0.1, "arrivalTime": -0.1},
                           "hotel":  {"price": 0.6, "star": 0.1, "rating": 0.2, "amenities": 0.1}}
        }"#;
        let file = write_temp(doc);
        let err = JsonWeightFile::new(file.path()).load_weights().await.unwrap_err();
        assert!(matches!(err, Error::Weights(_)), "got {:?}", err);
    }
}
