//! Time-bounded cache of scored inventory.
//!
//! Uses `DashMap` for concurrent reads. A miss or an expired entry is
//! refreshed by one caller; concurrent callers of the same key wait on a
//! `watch` channel for that refresh's outcome, success or failure, instead
//! of each fetching.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use common::config::CacheConfig;
use common::{Error, Result, ScoredFlight, ScoredHotel};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use inventory::{InventoryProvider, WeightSource};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::scoring::{score_flight_batch, score_hotel_batch};

/// Source of the current time for staleness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A scored batch and when it was fetched. Never mutated after insert.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub fetched_at: DateTime<Utc>,
    pub payload: Arc<[T]>,
}

impl<T> CacheEntry<T> {
    /// Stale once strictly more than `ttl` has elapsed.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.fetched_at) > ttl
    }
}

/// Result of one refresh, as handed to every caller that waited on it.
type Outcome<T> = Result<Arc<[T]>>;

type InFlight<T> = DashMap<String, watch::Receiver<Option<Outcome<T>>>>;

/// Key → entry map with a single TTL and a capacity bound.
pub struct TtlCache<T> {
    name: &'static str,
    ttl: chrono::Duration,
    max_entries: usize,
    entries: DashMap<String, CacheEntry<T>>,
    in_flight: InFlight<T>,
}

/// The refreshing caller's hold on a key. Dropping it, on any path,
/// removes the key from `in_flight`.
struct RefreshClaim<'a, T> {
    in_flight: &'a InFlight<T>,
    key: &'a str,
    tx: watch::Sender<Option<Outcome<T>>>,
}

impl<T> Drop for RefreshClaim<'_, T> {
    fn drop(&mut self) {
        self.in_flight.remove(self.key);
    }
}

enum Role<'a, T> {
    Leader(RefreshClaim<'a, T>),
    Follower(watch::Receiver<Option<Outcome<T>>>),
}

impl<T> TtlCache<T> {
    pub fn new(name: &'static str, ttl: chrono::Duration, max_entries: usize) -> Self {
        Self {
            name,
            ttl,
            max_entries: max_entries.max(1),
            entries: DashMap::new(),
            in_flight: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The payload for `key` if present and not stale at `now`.
    pub fn fresh(&self, key: &str, now: DateTime<Utc>) -> Option<Arc<[T]>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_stale(now, self.ttl))
            .map(|entry| Arc::clone(&entry.payload))
    }

    /// Return the cached payload, or await `refresh` and store its result.
    ///
    /// `refresh` is only polled by the caller that claims the key. Callers
    /// arriving while that refresh runs get its outcome, errors included.
    /// A failed refresh leaves any previous entry untouched and is not
    /// remembered once it completes.
    pub async fn get_or_refresh<F>(&self, key: &str, clock: &dyn Clock, refresh: F) -> Result<Arc<[T]>>
    where
        F: Future<Output = Result<Vec<T>>>,
    {
        let claim = loop {
            if let Some(payload) = self.fresh(key, clock.now()) {
                debug!("{} cache hit: {}", self.name, key);
                return Ok(payload);
            }

            match self.claim(key) {
                Role::Leader(claim) => break claim,
                Role::Follower(mut rx) => {
                    debug!("{} refresh in flight, waiting: {}", self.name, key);
                    // Err: the refreshing caller was dropped, so try again.
                    let shared = match rx.wait_for(Option::is_some).await {
                        Ok(outcome) => (*outcome).clone(),
                        Err(_) => None,
                    };
                    if let Some(shared) = shared {
                        return shared;
                    }
                }
            }
        };

        // A refresh may have landed between the freshness check and the claim.
        if let Some(payload) = self.fresh(key, clock.now()) {
            claim.tx.send_replace(Some(Ok(Arc::clone(&payload))));
            return Ok(payload);
        }

        let outcome: Outcome<T> = refresh.await.map(Arc::<[T]>::from);
        match &outcome {
            Ok(payload) => {
                self.entries.insert(
                    key.to_string(),
                    CacheEntry {
                        fetched_at: clock.now(),
                        payload: Arc::clone(payload),
                    },
                );
                self.evict_over_capacity(key);
            }
            Err(e) => debug!("{} refresh failed for {}: {}", self.name, key, e),
        }

        claim.tx.send_replace(Some(outcome.clone()));
        outcome
    }

    fn claim<'a>(&'a self, key: &'a str) -> Role<'a, T> {
        match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(e) => Role::Follower(e.get().clone()),
            Entry::Vacant(e) => {
                let (tx, rx) = watch::channel(None);
                e.insert(rx);
                Role::Leader(RefreshClaim {
                    in_flight: &self.in_flight,
                    key,
                    tx,
                })
            }
        }
    }

    fn evict_over_capacity(&self, keep: &str) {
        while self.entries.len() > self.max_entries {
            let oldest = self
                .entries
                .iter()
                .filter(|e| e.key() != keep)
                .min_by_key(|e| e.value().fetched_at)
                .map(|e| e.key().clone());

            let Some(key) = oldest else { break };
            self.entries.remove(&key);
            debug!("{} cache evicted {}", self.name, key);
        }
    }
}

/// Scored flights keyed by route and scored hotels keyed by city.
///
/// Each refresh fetches raw records, benchmarks that exact batch, loads
/// the current weight document and scores every record.
pub struct EntityCache {
    provider: Arc<dyn InventoryProvider>,
    weights: Arc<dyn WeightSource>,
    clock: Arc<dyn Clock>,
    refresh_timeout: Duration,
    flights: TtlCache<ScoredFlight>,
    hotels: TtlCache<ScoredHotel>,
}

impl EntityCache {
    pub fn new(
        provider: Arc<dyn InventoryProvider>,
        weights: Arc<dyn WeightSource>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            provider,
            weights,
            clock: Arc::new(SystemClock),
            refresh_timeout: Duration::from_secs(config.refresh_timeout_secs),
            flights: TtlCache::new(
                "flight",
                chrono::Duration::seconds(config.flight_ttl_secs as i64),
                config.max_entries,
            ),
            hotels: TtlCache::new(
                "hotel",
                chrono::Duration::seconds(config.hotel_ttl_secs as i64),
                config.max_entries,
            ),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn flight_key(origin: &str, destination: &str) -> String {
        format!("{}->{}", origin, destination)
    }

    pub fn flights(&self) -> &TtlCache<ScoredFlight> {
        &self.flights
    }

    pub fn hotels(&self) -> &TtlCache<ScoredHotel> {
        &self.hotels
    }

    /// Scored flights from `origin` to `destination`.
    pub async fn scored_flights(&self, origin: &str, destination: &str) -> Result<Arc<[ScoredFlight]>> {
        let key = Self::flight_key(origin, destination);
        let refresh = async {
            let started = Instant::now();
            let raw = self
                .bounded(&key, self.provider.lookup_flights(origin, destination))
                .await?;
            let weights = self.weights.load_weights().await?;
            let scored = score_flight_batch(raw, &weights).ok_or_else(|| Error::NoInventory(key.clone()))?;

            info!(
                "Refreshed flights {}: {} scored in {:?}",
                key,
                scored.len(),
                started.elapsed()
            );
            Ok::<_, Error>(scored)
        };

        self.flights.get_or_refresh(&key, self.clock.as_ref(), refresh).await
    }

    /// Scored hotels in `city`.
    pub async fn scored_hotels(&self, city: &str) -> Result<Arc<[ScoredHotel]>> {
        let refresh = async {
            let started = Instant::now();
            let raw = self.bounded(city, self.provider.lookup_hotels(city)).await?;
            let weights = self.weights.load_weights().await?;
            let scored = score_hotel_batch(raw, &weights).ok_or_else(|| Error::NoInventory(city.to_string()))?;

            info!(
                "Refreshed hotels {}: {} scored in {:?}",
                city,
                scored.len(),
                started.elapsed()
            );
            Ok::<_, Error>(scored)
        };

        self.hotels.get_or_refresh(city, self.clock.as_ref(), refresh).await
    }

    async fn bounded<T>(&self, key: &str, lookup: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.refresh_timeout, lookup)
            .await
            .map_err(|_| Error::ProviderTimeout {
                key: key.to_string(),
                timeout_ms: self.refresh_timeout.as_millis() as u64,
            })?
    }
}
