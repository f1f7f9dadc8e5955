//! Trip finder configuration types.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Inventory and weight document locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Entity cache parameters.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Search limits.
    #[serde(default)]
    pub search: SearchConfig,

    /// Supported cities, in enumeration order.
    #[serde(default = "default_cities")]
    pub cities: Vec<CityConfig>,
}

/// A supported city and its airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityConfig {
    /// Name as it appears in hotel addresses (e.g., "New York City").
    pub name: String,
    /// Airport code used by flight records (e.g., "JFK").
    pub airport: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_flights_path")]
    pub flights_path: String,
    #[serde(default = "default_hotels_path")]
    pub hotels_path: String,
    #[serde(default = "default_weights_path")]
    pub weights_path: String,
}

/// Cache timing and capacity (durations in seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Scored flights go stale after this long.
    #[serde(default = "default_flight_ttl")]
    pub flight_ttl_secs: u64,

    /// Scored hotels go stale after this long.
    #[serde(default = "default_hotel_ttl")]
    pub hotel_ttl_secs: u64,

    /// Upper bound on a single inventory lookup during refresh.
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_secs: u64,

    /// Max keys held per entity type before the oldest is evicted.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of trips returned per search.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Max (outbound, return, hotel) triples evaluated per search.
    #[serde(default = "default_max_triples")]
    pub max_triples: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_flights_path() -> String {
    "data/flights.json".into()
}
fn default_hotels_path() -> String {
    "data/hotels.json".into()
}
fn default_weights_path() -> String {
    "data/score-weights.json".into()
}

fn default_flight_ttl() -> u64 {
    24 * 60 * 60
}
fn default_hotel_ttl() -> u64 {
    30 * 24 * 60 * 60
}
fn default_refresh_timeout() -> u64 {
    10
}
fn default_max_entries() -> usize {
    256
}

fn default_top_n() -> usize {
    1
}
fn default_max_triples() -> u64 {
    5_000_000
}

fn default_cities() -> Vec<CityConfig> {
    [
        ("New York City", "JFK"),
        ("Los Angeles", "LAX"),
        ("London", "LHR"),
        ("Tokyo", "NRT"),
        ("Sydney", "SYD"),
    ]
    .into_iter()
    .map(|(name, airport)| CityConfig {
        name: name.into(),
        airport: airport.into(),
    })
    .collect()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            flights_path: default_flights_path(),
            hotels_path: default_hotels_path(),
            weights_path: default_weights_path(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            flight_ttl_secs: default_flight_ttl(),
            hotel_ttl_secs: default_hotel_ttl(),
            refresh_timeout_secs: default_refresh_timeout(),
            max_entries: default_max_entries(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            max_triples: default_max_triples(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            cache: CacheConfig::default(),
            search: SearchConfig::default(),
            cities: default_cities(),
        }
    }
}
