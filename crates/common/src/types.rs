//! Domain types shared across the trip finder.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::Error;

// ── Profiles ──────────────────────────────────────────────────────────

/// A named traveler preference that selects a weight set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Balanced,
    Luxury,
    Affordable,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Balanced, Profile::Luxury, Profile::Affordable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Balanced => "balanced",
            Profile::Luxury => "luxury",
            Profile::Affordable => "affordable",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(Profile::Balanced),
            "luxury" => Ok(Profile::Luxury),
            "affordable" => Ok(Profile::Affordable),
            other => Err(Error::UnsupportedProfile(other.to_string())),
        }
    }
}

/// One score per profile. Always complete: there is no way to build a
/// `ProfileScores` that is missing a profile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileScores {
    pub balanced: f64,
    pub luxury: f64,
    pub affordable: f64,
}

impl ProfileScores {
    /// Build scores by evaluating `f` once per profile.
    pub fn from_fn(mut f: impl FnMut(Profile) -> f64) -> Self {
        Self {
            balanced: f(Profile::Balanced),
            luxury: f(Profile::Luxury),
            affordable: f(Profile::Affordable),
        }
    }

    pub fn get(&self, profile: Profile) -> f64 {
        match profile {
            Profile::Balanced => self.balanced,
            Profile::Luxury => self.luxury,
            Profile::Affordable => self.affordable,
        }
    }
}

// ── Inventory Records ─────────────────────────────────────────────────

/// A one-way flight as stored in the flights file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Origin airport code.
    #[serde(rename = "from")]
    pub origin: String,
    /// Destination airport code.
    #[serde(rename = "to")]
    pub destination: String,
    /// Intermediate stop codes, in order. Empty for non-stop flights.
    #[serde(default)]
    pub stops: Vec<String>,
    pub price: f64,
    #[serde(with = "hh_mm")]
    pub departure_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub arrival_time: NaiveTime,
    /// Total duration in hours.
    pub duration: f64,
}

impl FlightRecord {
    pub fn departure_hour(&self) -> u32 {
        self.departure_time.hour()
    }

    pub fn arrival_hour(&self) -> u32 {
        self.arrival_time.hour()
    }
}

/// A hotel listing. The city is embedded in `address` as
/// `"street, city, country"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub name: String,
    pub address: String,
    pub stars: u8,
    pub rating: f64,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    pub price_per_night: f64,
}

impl HotelRecord {
    /// The city token of the address, if the address has one.
    pub fn city(&self) -> Option<&str> {
        self.address.split(',').nth(1).map(str::trim)
    }

    pub fn amenity_count(&self) -> usize {
        self.amenities.len()
    }
}

/// A record decorated with its per-profile scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub record: T,
    pub scores: ProfileScores,
}

pub type ScoredFlight = Scored<FlightRecord>;
pub type ScoredHotel = Scored<HotelRecord>;

// ── Weight Profiles ───────────────────────────────────────────────────

/// Per-feature weights for flights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightWeights {
    pub price: f64,
    pub duration: f64,
    pub stops: f64,
    pub departure_time: f64,
    pub arrival_time: f64,
}

/// Per-feature weights for hotels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotelWeights {
    pub price: f64,
    pub star: f64,
    pub rating: f64,
    pub amenities: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileWeights {
    pub flight: FlightWeights,
    pub hotel: HotelWeights,
}

/// The weight document, one entry per profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightDocument {
    pub balanced: ProfileWeights,
    pub luxury: ProfileWeights,
    pub affordable: ProfileWeights,
}

impl WeightDocument {
    pub fn get(&self, profile: Profile) -> &ProfileWeights {
        match profile {
            Profile::Balanced => &self.balanced,
            Profile::Luxury => &self.luxury,
            Profile::Affordable => &self.affordable,
        }
    }

    /// Reject negative or non-finite weights. Totals are not checked.
    pub fn validate(&self) -> Result<(), Error> {
        for profile in Profile::ALL {
            let w = self.get(profile);
            let values = [
                ("flight.price", w.flight.price),
                ("flight.duration", w.flight.duration),
                ("flight.stops", w.flight.stops),
                ("flight.departureTime", w.flight.departure_time),
                ("flight.arrivalTime", w.flight.arrival_time),
                ("hotel.price", w.hotel.price),
                ("hotel.star", w.hotel.star),
                ("hotel.rating", w.hotel.rating),
                ("hotel.amenities", w.hotel.amenities),
            ];
            for (name, value) in values {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::Weights(format!(
                        "{}.{} must be a finite number >= 0, got {}",
                        profile, name, value
                    )));
                }
            }
        }
        Ok(())
    }
}

// ── Trips ─────────────────────────────────────────────────────────────

/// A budget-feasible round trip. Owns copies of its legs and hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub budget: f64,
    pub nights: u32,
    /// Outbound + return + nights × nightly rate.
    pub price: f64,
    pub score: f64,
    /// Destination city name.
    pub destination: String,
    pub outbound: ScoredFlight,
    #[serde(rename = "return")]
    pub inbound: ScoredFlight,
    pub hotel: ScoredHotel,
}

// ── Serde helpers ─────────────────────────────────────────────────────

/// `"HH:MM"` time-of-day, tolerating a trailing `":SS"`.
mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
            .map_err(|e| serde::de::Error::custom(format!("invalid time {:?}: {}", raw, e)))
    }
}
