//! Trip recommendation engine.
//!
//! Scores flights and hotels per preference profile, caches the scored
//! batches with per-type TTLs, and ranks budget-feasible round trips.

pub mod benchmark;
pub mod cache;
pub mod combiner;
pub mod request;
pub mod scoring;

#[cfg(test)]
pub(crate) mod test_support;

pub use benchmark::{Bounds, FlightBenchmark, HotelBenchmark};
pub use cache::{CacheEntry, Clock, EntityCache, SystemClock, TtlCache};
pub use combiner::{trip_score, SearchStats, TripCombiner};
pub use request::SearchRequest;
pub use scoring::{score_flight, score_hotel, MAX_SCORE, MIN_SCORE};
