//! Per-feature min/max bounds used to normalize scores.
//!
//! Price and duration bounds come from the batch being scored. Hotel
//! stars, rating and amenity count use fixed policy bounds.

use common::{FlightRecord, HotelRecord};

/// Closed range of observed values for one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds over `values`, or `None` if there are none.
    fn observe(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self::new(v, v)),
            Some(b) => Some(Self::new(b.min.min(v), b.max.max(v))),
        })
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

pub const HOTEL_STAR_BOUNDS: Bounds = Bounds::new(1.0, 5.0);
pub const HOTEL_RATING_BOUNDS: Bounds = Bounds::new(3.0, 10.0);
pub const HOTEL_AMENITY_BOUNDS: Bounds = Bounds::new(1.0, 6.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightBenchmark {
    pub price: Bounds,
    pub duration: Bounds,
}

impl FlightBenchmark {
    /// Returns `None` for an empty batch.
    pub fn from_batch(flights: &[FlightRecord]) -> Option<Self> {
        Some(Self {
            price: Bounds::observe(flights.iter().map(|f| f.price))?,
            duration: Bounds::observe(flights.iter().map(|f| f.duration))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotelBenchmark {
    pub price: Bounds,
    pub stars: Bounds,
    pub rating: Bounds,
    pub amenities: Bounds,
}

impl HotelBenchmark {
    /// Returns `None` for an empty batch.
    pub fn from_batch(hotels: &[HotelRecord]) -> Option<Self> {
        Some(Self {
            price: Bounds::observe(hotels.iter().map(|h| h.price_per_night))?,
            stars: HOTEL_STAR_BOUNDS,
            rating: HOTEL_RATING_BOUNDS,
            amenities: HOTEL_AMENITY_BOUNDS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flight, hotel};

    #[test]
    fn test_flight_bounds_cover_batch() {
        let batch = vec![
            flight("JFK", "LHR", 500.0, 7.0, 0, "10:00", "20:00"),
            flight("JFK", "LHR", 350.0, 12.5, 2, "06:00", "23:00"),
            flight("JFK", "LHR", 720.0, 6.5, 0, "13:00", "01:00"),
        ];
        let bm = FlightBenchmark::from_batch(&batch).unwrap();
        assert_eq!(bm.price, Bounds::new(350.0, 720.0));
        assert_eq!(bm.duration, Bounds::new(6.5, 12.5));
    }

    #[test]
    fn test_empty_batch_has_no_benchmark() {
        assert!(FlightBenchmark::from_batch(&[]).is_none());
        assert!(HotelBenchmark::from_batch(&[]).is_none());
    }

    #[test]
    fn test_hotel_qualitative_bounds_are_fixed() {
        let batch = vec![hotel("A", "London", 4, 8.0, 3, 150.0), hotel("B", "London", 2, 5.0, 1, 80.0)];
        let bm = HotelBenchmark::from_batch(&batch).unwrap();
        assert_eq!(bm.price, Bounds::new(80.0, 150.0));
        assert_eq!(bm.stars, HOTEL_STAR_BOUNDS);
        assert_eq!(bm.rating, Bounds::new(3.0, 10.0));
        assert_eq!(bm.amenities, Bounds::new(1.0, 6.0));
    }

    #[test]
    fn test_single_record_has_zero_width() {
        let batch = vec![flight("LAX", "NRT", 900.0, 11.0, 0, "12:00", "16:00")];
        let bm = FlightBenchmark::from_batch(&batch).unwrap();
        assert_eq!(bm.price.width(), 0.0);
    }
}
