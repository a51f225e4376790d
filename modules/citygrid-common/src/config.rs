use std::env;

/// Engine configuration loaded from environment variables.
/// Every knob has a default, so the engine runs with an empty environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default hop horizon for the road-impact view.
    pub default_hops_road: u32,
    /// Default hop horizon for the zone, hospital, and summary views.
    pub default_hops_impact: u32,
    /// Ceiling on requested hops; larger requests are rejected before traversal.
    pub max_hops: u32,
    /// Per-call timeout for spatial store lookups, in milliseconds.
    pub spatial_timeout_ms: u64,
    /// Number of hospitals returned by the summary view.
    pub summary_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_hops_road: 2,
            default_hops_impact: 3,
            max_hops: 8,
            spatial_timeout_ms: 5000,
            summary_limit: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if a variable is present but malformed.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_hops_road: env_or("CITYGRID_DEFAULT_HOPS_ROAD", defaults.default_hops_road),
            default_hops_impact: env_or(
                "CITYGRID_DEFAULT_HOPS_IMPACT",
                defaults.default_hops_impact,
            ),
            max_hops: env_or("CITYGRID_MAX_HOPS", defaults.max_hops),
            spatial_timeout_ms: env_or("CITYGRID_SPATIAL_TIMEOUT_MS", defaults.spatial_timeout_ms),
            summary_limit: env_or("CITYGRID_SUMMARY_LIMIT", defaults.summary_limit),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}
