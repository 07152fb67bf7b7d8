//! Resource health classification.
//!
//! A resource's status tier is never stored; it is derived on every read from
//! the current quantity and the optional target.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tier boundaries (percent of target, inclusive lower bounds)
// ---------------------------------------------------------------------------

/// At or above this percentage of target the resource is over-stocked.
pub const ABOVE_TARGET_PCT: i128 = 150;
/// At or above this percentage of target the resource meets its target.
pub const AT_TARGET_PCT: i128 = 100;
/// At or above this percentage of target the resource is low but not critical.
pub const BELOW_TARGET_PCT: i128 = 50;

// ---------------------------------------------------------------------------
// Status tier
// ---------------------------------------------------------------------------

/// Derived health tier of a resource.
///
/// Variants are declared from worst to best so the derived `Ord` follows the
/// quantity/target ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Critical,
    BelowTarget,
    AtTarget,
    AboveTarget,
}

impl StatusTier {
    /// All tiers, worst first.
    pub const ALL: [StatusTier; 4] = [
        StatusTier::Critical,
        StatusTier::BelowTarget,
        StatusTier::AtTarget,
        StatusTier::AboveTarget,
    ];

    /// The wire name of the tier (`"below_target"` etc.).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::BelowTarget => "below_target",
            Self::AtTarget => "at_target",
            Self::AboveTarget => "above_target",
        }
    }

    /// Parse a wire name back into a tier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Classify a quantity against an optional target.
///
/// A missing or non-positive target means "no target" and is always
/// [`StatusTier::AtTarget`]. Otherwise the ratio is compared in integer
/// arithmetic (`quantity * 100` against `pct * target`) so the 50/100/150
/// boundaries land exactly in the higher tier.
pub fn classify(quantity: i64, target: Option<i64>) -> StatusTier {
    let target = match target {
        Some(t) if t > 0 => i128::from(t),
        _ => return StatusTier::AtTarget,
    };
    let scaled = i128::from(quantity) * 100;

    if scaled >= ABOVE_TARGET_PCT * target {
        StatusTier::AboveTarget
    } else if scaled >= AT_TARGET_PCT * target {
        StatusTier::AtTarget
    } else if scaled >= BELOW_TARGET_PCT * target {
        StatusTier::BelowTarget
    } else {
        StatusTier::Critical
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- no target ------------------------------------------------------------

    #[test]
    fn missing_target_is_at_target() {
        assert_eq!(classify(0, None), StatusTier::AtTarget);
        assert_eq!(classify(5_000, None), StatusTier::AtTarget);
    }

    #[test]
    fn non_positive_target_is_at_target() {
        for q in [0, 1, 49, 100, 1_000_000] {
            assert_eq!(classify(q, Some(0)), StatusTier::AtTarget);
            assert_eq!(classify(q, Some(-10)), StatusTier::AtTarget);
        }
    }

    // -- boundaries -----------------------------------------------------------

    #[test]
    fn boundaries_belong_to_higher_tier() {
        assert_eq!(classify(50, Some(100)), StatusTier::BelowTarget);
        assert_eq!(classify(100, Some(100)), StatusTier::AtTarget);
        assert_eq!(classify(150, Some(100)), StatusTier::AboveTarget);
    }

    #[test]
    fn just_below_boundaries() {
        assert_eq!(classify(49, Some(100)), StatusTier::Critical);
        assert_eq!(classify(99, Some(100)), StatusTier::BelowTarget);
        assert_eq!(classify(149, Some(100)), StatusTier::AtTarget);
    }

    #[test]
    fn fractional_boundaries_with_odd_target() {
        // 3 / 2 = 150% exactly.
        assert_eq!(classify(3, Some(2)), StatusTier::AboveTarget);
        // 1 / 3 = 33.3%.
        assert_eq!(classify(1, Some(3)), StatusTier::Critical);
        // 2 / 3 = 66.6%.
        assert_eq!(classify(2, Some(3)), StatusTier::BelowTarget);
    }

    #[test]
    fn zero_quantity_with_target_is_critical() {
        assert_eq!(classify(0, Some(1)), StatusTier::Critical);
    }

    #[test]
    fn large_values_do_not_overflow() {
        assert_eq!(classify(i64::MAX, Some(1)), StatusTier::AboveTarget);
        assert_eq!(classify(1, Some(i64::MAX)), StatusTier::Critical);
    }

    // -- monotonicity ---------------------------------------------------------

    #[test]
    fn monotonic_in_quantity() {
        for target in [1, 3, 7, 100, 333] {
            let mut prev = classify(0, Some(target));
            for q in 0..=(target * 3) {
                let tier = classify(q, Some(target));
                assert!(tier >= prev, "q={q} t={target}: {tier:?} < {prev:?}");
                prev = tier;
            }
        }
    }

    // -- names ----------------------------------------------------------------

    #[test]
    fn wire_names_match_serde() {
        for tier in StatusTier::ALL {
            let json = serde_json::to_value(tier).unwrap();
            assert_eq!(json, tier.as_str());
            assert_eq!(StatusTier::from_name(tier.as_str()), Some(tier));
        }
        assert_eq!(StatusTier::from_name("unknown"), None);
    }
}
