//! Hospital risk classification: pure functions of hop distance.

use citygrid_common::RiskTier;

/// Map a hospital's nearest-road hop distance to a risk tier.
pub fn risk_tier(hop: u32) -> RiskTier {
    match hop {
        0 => RiskTier::Critical,
        1 => RiskTier::High,
        2 => RiskTier::Medium,
        _ => RiskTier::Low,
    }
}

/// Justification shown next to each tier in the hospital view.
pub fn tier_reason(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Critical => {
            "Hospital is directly connected to the failed road. Immediate access disruption expected."
        }
        RiskTier::High => "Hospital access roads are directly connected to the failed road.",
        RiskTier::Medium => "Hospital is reachable only via secondary roads affected by the failure.",
        RiskTier::Low => "Hospital is indirectly affected with alternative routes still available.",
    }
}

/// Priority score: `max(0, (max_hops + 1) - hop)`. Higher is more urgent.
/// Scales with the query's hop horizon, so scores from different horizons
/// are not comparable.
pub fn priority_score(max_hops: u32, hop: u32) -> u32 {
    (max_hops + 1).saturating_sub(hop)
}

/// Short explanation used by the summary view.
pub fn summary_explanation(hop: u32) -> &'static str {
    match hop {
        0 => "Directly dependent on the failed road",
        1 => "Dependent on immediate connecting roads",
        _ => "Indirect dependency via secondary routes",
    }
}
