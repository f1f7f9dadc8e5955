//! Trip combiner and ranker.
//!
//! For every supported destination, enumerates (outbound × return × hotel)
//! triples, keeps the ones within budget, and ranks them by composite
//! score. Only the best `top_n` candidates are held at any time.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use common::config::CityConfig;
use common::{AppConfig, Error, Profile, Result, ScoredFlight, ScoredHotel, Trip};
use tracing::{debug, info, warn};

use crate::cache::EntityCache;
use crate::request::SearchRequest;
use crate::scoring::{round1, round2};

/// Composite trip score: the mean of the three component scores.
pub fn trip_score(outbound: f64, inbound: f64, hotel: f64) -> f64 {
    round1((outbound + inbound + hotel) / 30.0 * 10.0)
}

/// Scored inventory for one destination.
struct Destination {
    city: String,
    outbound: Arc<[ScoredFlight]>,
    inbound: Arc<[ScoredFlight]>,
    hotels: Arc<[ScoredHotel]>,
}

/// A feasible triple, by index into its destination's inventory.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f64,
    price: f64,
    /// (destination, outbound, return, hotel) enumeration position.
    position: (usize, usize, usize, usize),
}

impl Ord for Candidate {
    /// Greater is better: higher score, then lower price, then earlier
    /// enumeration position.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.price.total_cmp(&self.price))
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Keeps the `n` best candidates seen so far.
struct TopN {
    n: usize,
    heap: BinaryHeap<Reverse<Candidate>>,
}

impl TopN {
    fn new(n: usize) -> Self {
        Self {
            n,
            heap: BinaryHeap::with_capacity(n.saturating_add(1).min(1024)),
        }
    }

    fn offer(&mut self, candidate: Candidate) {
        if self.heap.len() < self.n {
            self.heap.push(Reverse(candidate));
        } else if let Some(Reverse(worst)) = self.heap.peek() {
            if candidate > *worst {
                self.heap.pop();
                self.heap.push(Reverse(candidate));
            }
        }
    }

    /// Best first.
    fn into_ranked(self) -> Vec<Candidate> {
        self.heap.into_sorted_vec().into_iter().map(|Reverse(c)| c).collect()
    }
}

/// Counters for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub destinations_searched: usize,
    pub destinations_skipped: usize,
    pub triples_evaluated: u64,
    pub feasible: u64,
    pub truncated: bool,
}

pub struct TripCombiner {
    cache: Arc<EntityCache>,
    cities: Vec<CityConfig>,
    top_n: usize,
    max_triples: u64,
}

impl TripCombiner {
    pub fn new(cache: Arc<EntityCache>, config: &AppConfig) -> Self {
        Self {
            cache,
            cities: config.cities.clone(),
            top_n: config.search.top_n,
            max_triples: config.search.max_triples,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_max_triples(mut self, max_triples: u64) -> Self {
        self.max_triples = max_triples;
        self
    }

    /// Best trips for `request`, highest score first.
    ///
    /// An empty result means nothing fit the budget; it is not an error.
    pub async fn recommend(&self, request: &SearchRequest) -> Result<Vec<Trip>> {
        self.recommend_with_stats(request).await.map(|(trips, _)| trips)
    }

    pub async fn recommend_with_stats(&self, request: &SearchRequest) -> Result<(Vec<Trip>, SearchStats)> {
        let origin = self
            .cities
            .iter()
            .find(|c| c.name == request.origin)
            .ok_or_else(|| Error::UnknownOrigin(request.origin.clone()))?;

        let mut stats = SearchStats::default();
        let mut ranker = TopN::new(self.top_n);
        let mut destinations: Vec<Destination> = Vec::new();

        for city in self.cities.iter().filter(|c| c.name != origin.name) {
            let destination = match self.load_destination(origin, city).await {
                Ok(d) => d,
                Err(e) if e.is_no_inventory() => {
                    warn!("Skipping {}: {}", city.name, e);
                    stats.destinations_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            stats.destinations_searched += 1;
            let slot = destinations.len();
            let complete = self.rank_destination(&destination, slot, request, &mut ranker, &mut stats);
            destinations.push(destination);

            if !complete {
                warn!(
                    "Search truncated after {} triples; results cover a partial inventory",
                    stats.triples_evaluated
                );
                stats.truncated = true;
                break;
            }
        }

        let trips: Vec<Trip> = ranker
            .into_ranked()
            .into_iter()
            .map(|c| materialize(&destinations, c, request))
            .collect();

        info!(
            "Search from {} ({}): {} destinations, {} skipped, {} triples, {} feasible, {} returned",
            origin.name,
            request.profile,
            stats.destinations_searched,
            stats.destinations_skipped,
            stats.triples_evaluated,
            stats.feasible,
            trips.len()
        );

        Ok((trips, stats))
    }

    async fn load_destination(&self, origin: &CityConfig, city: &CityConfig) -> Result<Destination> {
        let outbound = self.cache.scored_flights(&origin.airport, &city.airport).await?;
        let inbound = self.cache.scored_flights(&city.airport, &origin.airport).await?;
        let hotels = self.cache.scored_hotels(&city.name).await?;

        debug!(
            "{}: {} outbound, {} return, {} hotels",
            city.name,
            outbound.len(),
            inbound.len(),
            hotels.len()
        );

        Ok(Destination {
            city: city.name.clone(),
            outbound,
            inbound,
            hotels,
        })
    }

    /// Offer every feasible triple of one destination to `ranker`.
    ///
    /// Returns `false` if the triple cap was reached.
    fn rank_destination(
        &self,
        dest: &Destination,
        slot: usize,
        request: &SearchRequest,
        ranker: &mut TopN,
        stats: &mut SearchStats,
    ) -> bool {
        let nights = f64::from(request.nights);
        let budget = request.budget;
        let profile: Profile = request.profile;

        let cheapest_return = min_price(dest.inbound.iter().map(|f| f.record.price));
        let cheapest_stay = min_price(dest.hotels.iter().map(|h| h.record.price_per_night * nights));

        for (i, out) in dest.outbound.iter().enumerate() {
            if over_budget(out.record.price + cheapest_return + cheapest_stay, budget) {
                continue;
            }

            for (j, ret) in dest.inbound.iter().enumerate() {
                let flights = out.record.price + ret.record.price;
                if over_budget(flights + cheapest_stay, budget) {
                    continue;
                }

                for (k, hotel) in dest.hotels.iter().enumerate() {
                    if stats.triples_evaluated >= self.max_triples {
                        return false;
                    }
                    stats.triples_evaluated += 1;

                    let price = round2(flights + hotel.record.price_per_night * nights);
                    if price > budget {
                        continue;
                    }

                    stats.feasible += 1;
                    ranker.offer(Candidate {
                        score: trip_score(
                            out.scores.get(profile),
                            ret.scores.get(profile),
                            hotel.scores.get(profile),
                        ),
                        price,
                        position: (slot, i, j, k),
                    });
                }
            }
        }

        true
    }
}

/// Prices are compared after rounding to cents, which can lower a sum by
/// up to half a cent.
const HALF_CENT: f64 = 0.005;

/// True when even the cheapest completion of a partial trip is over budget.
fn over_budget(lower_bound: f64, budget: f64) -> bool {
    lower_bound - HALF_CENT > budget
}

fn min_price(prices: impl Iterator<Item = f64>) -> f64 {
    prices.fold(f64::INFINITY, f64::min)
}

fn materialize(destinations: &[Destination], c: Candidate, request: &SearchRequest) -> Trip {
    let (slot, i, j, k) = c.position;
    let dest = &destinations[slot];
    Trip {
        budget: request.budget,
        nights: request.nights,
        price: c.price,
        score: c.score,
        destination: dest.city.clone(),
        outbound: dest.outbound[i].clone(),
        inbound: dest.inbound[j].clone(),
        hotel: dest.hotels[k].clone(),
    }
}
