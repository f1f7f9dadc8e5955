//! Feature scoring and per-profile weighting.
//!
//! Every raw feature is first reduced to a point in `[MIN_SCORE, MAX_SCORE]`.
//! A profile's score is the weighted sum of those points, rounded to one
//! decimal. Weights are applied as given; with weights summing to 1 the
//! result stays in `[MIN_SCORE, MAX_SCORE]`.

use common::{
    FlightRecord, FlightWeights, HotelRecord, HotelWeights, ProfileScores, Scored, WeightDocument,
};

use crate::benchmark::{Bounds, FlightBenchmark, HotelBenchmark};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;
const SCORE_RANGE: f64 = MAX_SCORE - MIN_SCORE;

/// Flat deduction per intermediate stop.
const STOP_PENALTY: f64 = 2.0;

// ── Normalization ─────────────────────────────────────────────────────

/// Point for a feature where smaller values are better (price, duration).
///
/// A zero-width range scores every value at `MAX_SCORE`.
pub fn lower_is_better(value: f64, bounds: Bounds) -> f64 {
    if bounds.width() <= 0.0 {
        return MAX_SCORE;
    }
    clamp_point((bounds.max - value) / bounds.width() * SCORE_RANGE + MIN_SCORE)
}

/// Point for a feature where larger values are better (stars, rating).
pub fn higher_is_better(value: f64, bounds: Bounds) -> f64 {
    if bounds.width() <= 0.0 {
        return MAX_SCORE;
    }
    clamp_point((value - bounds.min) / bounds.width() * SCORE_RANGE + MIN_SCORE)
}

pub fn stops_point(stops: usize) -> f64 {
    clamp_point(MAX_SCORE - stops as f64 * STOP_PENALTY)
}

/// Banded time-of-day point, evaluated outside-in on the hour:
///
/// | hours            | point           |
/// |------------------|-----------------|
/// | 11..=15          | max             |
/// | 9..=10, 16..=18  | 90% of range    |
/// | 7..=8, 19..=21   | 75% of range    |
/// | otherwise        | min             |
pub fn time_of_day_point(hour: u32) -> f64 {
    if !(7..=21).contains(&hour) {
        MIN_SCORE
    } else if !(9..=18).contains(&hour) {
        MIN_SCORE + SCORE_RANGE * 0.75
    } else if !(11..=15).contains(&hour) {
        MIN_SCORE + SCORE_RANGE * 0.9
    } else {
        MAX_SCORE
    }
}

fn clamp_point(point: f64) -> f64 {
    point.clamp(MIN_SCORE, MAX_SCORE)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ── Flights ───────────────────────────────────────────────────────────

/// Normalized feature points for one flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPoints {
    pub price: f64,
    pub duration: f64,
    pub stops: f64,
    pub departure: f64,
    pub arrival: f64,
}

impl FlightPoints {
    pub fn new(flight: &FlightRecord, bm: &FlightBenchmark) -> Self {
        Self {
            // Only the flight price point is kept to two decimals.
            price: round2(lower_is_better(flight.price, bm.price)),
            duration: lower_is_better(flight.duration, bm.duration),
            stops: stops_point(flight.stops.len()),
            departure: time_of_day_point(flight.departure_hour()),
            arrival: time_of_day_point(flight.arrival_hour()),
        }
    }

    pub fn weighted(&self, w: &FlightWeights) -> f64 {
        round1(
            self.price * w.price
                + self.duration * w.duration
                + self.stops * w.stops
                + self.departure * w.departure_time
                + self.arrival * w.arrival_time,
        )
    }
}

pub fn score_flight(
    flight: &FlightRecord,
    bm: &FlightBenchmark,
    weights: &WeightDocument,
) -> ProfileScores {
    let points = FlightPoints::new(flight, bm);
    ProfileScores::from_fn(|profile| points.weighted(&weights.get(profile).flight))
}

// ── Hotels ────────────────────────────────────────────────────────────

/// Normalized feature points for one hotel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotelPoints {
    pub price: f64,
    pub stars: f64,
    pub rating: f64,
    pub amenities: f64,
}

impl HotelPoints {
    pub fn new(hotel: &HotelRecord, bm: &HotelBenchmark) -> Self {
        Self {
            price: lower_is_better(hotel.price_per_night, bm.price),
            stars: higher_is_better(f64::from(hotel.stars), bm.stars),
            rating: higher_is_better(hotel.rating, bm.rating),
            amenities: higher_is_better(hotel.amenity_count() as f64, bm.amenities),
        }
    }

    pub fn weighted(&self, w: &HotelWeights) -> f64 {
        round1(
            self.price * w.price
                + self.stars * w.star
                + self.rating * w.rating
                + self.amenities * w.amenities,
        )
    }
}

pub fn score_hotel(
    hotel: &HotelRecord,
    bm: &HotelBenchmark,
    weights: &WeightDocument,
) -> ProfileScores {
    let points = HotelPoints::new(hotel, bm);
    ProfileScores::from_fn(|profile| points.weighted(&weights.get(profile).hotel))
}

// ── Batches ───────────────────────────────────────────────────────────

/// Benchmark and score a flight batch. `None` if the batch is empty.
pub fn score_flight_batch(
    flights: Vec<FlightRecord>,
    weights: &WeightDocument,
) -> Option<Vec<Scored<FlightRecord>>> {
    let bm = FlightBenchmark::from_batch(&flights)?;
    Some(
        flights
            .into_iter()
            .map(|record| {
                let scores = score_flight(&record, &bm, weights);
                Scored { record, scores }
            })
            .collect(),
    )
}

/// Benchmark and score a hotel batch. `None` if the batch is empty.
pub fn score_hotel_batch(
    hotels: Vec<HotelRecord>,
    weights: &WeightDocument,
) -> Option<Vec<Scored<HotelRecord>>> {
    let bm = HotelBenchmark::from_batch(&hotels)?;
    Some(
        hotels
            .into_iter()
            .map(|record| {
                let scores = score_hotel(&record, &bm, weights);
                Scored { record, scores }
            })
            .collect(),
    )
}
