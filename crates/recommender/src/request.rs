//! Search request parsing and validation.
//!
//! Raw parameters arrive as optional strings (query string, CLI flags).
//! Anything missing or malformed is rejected here, before the combiner
//! runs.

use common::{Error, Profile, Result};

/// A validated search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: String,
    pub nights: u32,
    pub budget: f64,
    pub profile: Profile,
}

impl SearchRequest {
    /// Validate raw parameters.
    ///
    /// Missing parameters are reported together, before any value is
    /// parsed. An unknown profile gets its own error.
    pub fn from_params(
        origin: Option<&str>,
        nights: Option<&str>,
        budget: Option<&str>,
        profile: Option<&str>,
    ) -> Result<Self> {
        let (origin, nights, budget, profile) =
            (present(origin), present(nights), present(budget), present(profile));

        let missing: Vec<String> = [
            ("origin", origin.is_none()),
            ("nights", nights.is_none()),
            ("budget", budget.is_none()),
            ("profile", profile.is_none()),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| name.to_string())
        .collect();

        let (Some(origin), Some(nights), Some(budget), Some(profile)) = (origin, nights, budget, profile)
        else {
            return Err(Error::MissingParameter(missing));
        };

        let profile: Profile = profile.parse()?;

        let nights = nights
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| invalid("nights", "must be a positive integer"))?;

        let budget = budget
            .parse::<f64>()
            .ok()
            .filter(|b| b.is_finite() && *b > 0.0)
            .ok_or_else(|| invalid("budget", "must be a positive number"))?;

        Ok(Self {
            origin: origin.to_string(),
            nights,
            budget,
            profile,
        })
    }

    pub fn new(origin: impl Into<String>, nights: u32, budget: f64, profile: Profile) -> Self {
        Self {
            origin: origin.into(),
            nights,
            budget,
            profile,
        }
    }

    /// One-line human summary of the search.
    pub fn describe(&self) -> String {
        format!(
            "a {} trip from {} for {} nights with a budget of ${}",
            self.profile, self.origin, self.nights, self.budget
        )
    }
}

/// Trimmed value, or `None` when absent or blank.
fn present(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
