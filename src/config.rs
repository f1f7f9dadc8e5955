//! Configuration loader: merges env vars, .env file, and config.toml.

use common::{AppConfig, Error};
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| Error::Config(format!("{env_name} must be an integer > 0")))
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.cities.len() < 2 {
        issues.push("cities must contain at least two cities".into());
    }
    for (i, city) in config.cities.iter().enumerate() {
        if city.name.trim().is_empty() || city.airport.trim().is_empty() {
            issues.push(format!("cities[{}] needs both name and airport", i));
        }
        if config.cities[..i].iter().any(|c| c.name == city.name) {
            issues.push(format!("cities contains {} more than once", city.name));
        }
    }

    if config.data.flights_path.trim().is_empty() {
        issues.push("data.flights_path must be set".into());
    }
    if config.data.hotels_path.trim().is_empty() {
        issues.push("data.hotels_path must be set".into());
    }
    if config.data.weights_path.trim().is_empty() {
        issues.push("data.weights_path must be set".into());
    }

    if config.cache.flight_ttl_secs == 0 {
        issues.push("cache.flight_ttl_secs must be > 0".into());
    }
    if config.cache.hotel_ttl_secs == 0 {
        issues.push("cache.hotel_ttl_secs must be > 0".into());
    }
    if config.cache.refresh_timeout_secs == 0 {
        issues.push("cache.refresh_timeout_secs must be > 0".into());
    }
    if config.cache.max_entries == 0 {
        issues.push("cache.max_entries must be > 0".into());
    }

    if config.search.top_n == 0 {
        issues.push("search.top_n must be > 0".into());
    }
    if config.search.max_triples == 0 {
        issues.push("search.max_triples must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load configuration from defaults, a TOML file, and the environment.
///
/// `path` overrides the default `config.toml`; an explicit path that does
/// not exist is an error, a missing default file is not.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Layer the config file over them.
    let config_path = path.unwrap_or_else(|| Path::new("config.toml"));
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
    } else if path.is_some() {
        return Err(Error::Config(format!(
            "Config file {} not found",
            config_path.display()
        )));
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(p) = std::env::var("TRIP_FLIGHTS_PATH") {
        config.data.flights_path = p;
    }
    if let Ok(p) = std::env::var("TRIP_HOTELS_PATH") {
        config.data.hotels_path = p;
    }
    if let Ok(p) = std::env::var("TRIP_WEIGHTS_PATH") {
        config.data.weights_path = p;
    }
    if let Ok(raw) = std::env::var("TRIP_FLIGHT_TTL_SECS") {
        config.cache.flight_ttl_secs = parse_positive_u64(&raw, "TRIP_FLIGHT_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("TRIP_HOTEL_TTL_SECS") {
        config.cache.hotel_ttl_secs = parse_positive_u64(&raw, "TRIP_HOTEL_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("TRIP_TOP_N") {
        config.search.top_n = parse_positive_u64(&raw, "TRIP_TOP_N")? as usize;
    }
    if let Ok(raw) = std::env::var("TRIP_MAX_TRIPLES") {
        config.search.max_triples = parse_positive_u64(&raw, "TRIP_MAX_TRIPLES")?;
    }

    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_validation_collects_every_issue() {
        let mut cfg = AppConfig::default();
        cfg.search.top_n = 0;
        cfg.cache.hotel_ttl_secs = 0;
        cfg.cities.push(cfg.cities[0].clone());

        let msg = validate_config(&cfg).unwrap_err().to_string();
        assert!(msg.contains("search.top_n"), "{}", msg);
        assert!(msg.contains("cache.hotel_ttl_secs"), "{}", msg);
        assert!(msg.contains("New York City more than once"), "{}", msg);
    }

    #[test]
    fn test_toml_layer_keeps_unset_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [search]
            top_n = 3

            [[cities]]
            name = "Paris"
            airport = "CDG"

            [[cities]]
            name = "Rome"
            airport = "FCO"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.search.top_n, 3);
        assert_eq!(cfg.cache.flight_ttl_secs, 86_400);
        assert_eq!(cfg.cities.len(), 2);
        assert_eq!(cfg.cities[1].airport, "FCO");
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_env_number_parsing() {
        assert_eq!(parse_positive_u64(" 42 ", "X").unwrap(), 42);
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("-3", "X").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = load_config(Some(Path::new("/nonexistent/trip-finder.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"), "{}", err);
    }
}
