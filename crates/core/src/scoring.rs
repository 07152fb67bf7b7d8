//! Contribution scoring.
//!
//! Converts a committed quantity change into a points award. The weighting
//! tables are injected through [`ScoringPolicy`] (loaded from configuration)
//! so the formula stays fixed while the balance stays tunable.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::quantity_change::UpdateType;
use crate::resource_status::StatusTier;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Action type
// ---------------------------------------------------------------------------

/// Kind of contribution a quantity change represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Add,
    Set,
    Remove,
}

impl ActionType {
    /// Derive the action type for a change.
    ///
    /// Absolute updates are always `Set`; relative updates are `Add` or
    /// `Remove` by sign. A zero change has no action and earns nothing.
    pub fn for_change(update_type: UpdateType, change_amount: i64) -> Option<Self> {
        if change_amount == 0 {
            return None;
        }
        Some(match update_type {
            UpdateType::Absolute => Self::Set,
            UpdateType::Relative if change_amount > 0 => Self::Add,
            UpdateType::Relative => Self::Remove,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Set => "set",
            Self::Remove => "remove",
        }
    }
}

// ---------------------------------------------------------------------------
// Weight tables
// ---------------------------------------------------------------------------

/// Points weight per status tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierWeights {
    pub critical: f64,
    pub below_target: f64,
    pub at_target: f64,
    pub above_target: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            critical: 2.0,
            below_target: 1.5,
            at_target: 1.0,
            above_target: 0.5,
        }
    }
}

impl TierWeights {
    pub fn weight(&self, tier: StatusTier) -> f64 {
        match tier {
            StatusTier::Critical => self.critical,
            StatusTier::BelowTarget => self.below_target,
            StatusTier::AtTarget => self.at_target,
            StatusTier::AboveTarget => self.above_target,
        }
    }

    /// Parse a `tier=weight` list such as `critical=2,at_target=1`.
    ///
    /// Tiers not mentioned keep their default weight.
    pub fn parse(list: &str) -> Result<Self, CoreError> {
        let mut weights = Self::default();
        for (key, value) in parse_weight_pairs(list, "SCORING_TIER_WEIGHTS")? {
            let slot = match StatusTier::from_name(key) {
                Some(StatusTier::Critical) => &mut weights.critical,
                Some(StatusTier::BelowTarget) => &mut weights.below_target,
                Some(StatusTier::AtTarget) => &mut weights.at_target,
                Some(StatusTier::AboveTarget) => &mut weights.above_target,
                None => {
                    return Err(CoreError::Validation(format!(
                        "Unknown status tier '{key}' in tier weights"
                    )))
                }
            };
            *slot = value;
        }
        Ok(weights)
    }
}

/// Points weight per action type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActionWeights {
    pub add: f64,
    pub set: f64,
    pub remove: f64,
}

impl Default for ActionWeights {
    fn default() -> Self {
        Self {
            add: 1.0,
            set: 0.5,
            remove: 0.5,
        }
    }
}

impl ActionWeights {
    pub fn weight(&self, action: ActionType) -> f64 {
        match action {
            ActionType::Add => self.add,
            ActionType::Set => self.set,
            ActionType::Remove => self.remove,
        }
    }

    /// Parse an `action=weight` list such as `add=1,remove=0.25`.
    pub fn parse(list: &str) -> Result<Self, CoreError> {
        let mut weights = Self::default();
        for (key, value) in parse_weight_pairs(list, "SCORING_ACTION_WEIGHTS")? {
            let slot = match key {
                "add" => &mut weights.add,
                "set" => &mut weights.set,
                "remove" => &mut weights.remove,
                other => {
                    return Err(CoreError::Validation(format!(
                        "Unknown action type '{other}' in action weights"
                    )))
                }
            };
            *slot = value;
        }
        Ok(weights)
    }
}

/// Split `a=1,b=2.5` into `(key, weight)` pairs. Weights must be finite and >= 0.
fn parse_weight_pairs<'a>(list: &'a str, name: &str) -> Result<Vec<(&'a str, f64)>, CoreError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (key, raw) = pair.split_once('=').ok_or_else(|| {
                CoreError::Validation(format!("{name}: expected key=weight, got '{pair}'"))
            })?;
            let value: f64 = raw.trim().parse().map_err(|_| {
                CoreError::Validation(format!("{name}: '{}' is not a number", raw.trim()))
            })?;
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{name}: weight for '{}' must be a non-negative number",
                    key.trim()
                )));
            }
            Ok((key.trim(), value))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Policy and calculation
// ---------------------------------------------------------------------------

/// Resource snapshot the award is computed against.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub name: &'a str,
    pub category: &'a str,
    /// Status tier of the resource *before* the change was applied.
    pub status: StatusTier,
    pub multiplier: f64,
}

/// Breakdown of one points award. Returned to the caller, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsCalculation {
    pub user_id: DbId,
    pub resource_id: DbId,
    pub resource_name: String,
    pub category: String,
    pub action_type: ActionType,
    pub magnitude: u64,
    pub status: StatusTier,
    pub base_points: f64,
    pub multiplier: f64,
    pub final_points: i64,
}

/// Injectable scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringPolicy {
    pub points_per_unit: f64,
    pub action_weights: ActionWeights,
    pub tier_weights: TierWeights,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            points_per_unit: 1.0,
            action_weights: ActionWeights::default(),
            tier_weights: TierWeights::default(),
        }
    }
}

impl ScoringPolicy {
    /// Compute the award for one contribution.
    ///
    /// `base = magnitude * points_per_unit * action_weight * tier_weight`,
    /// `final = round(base * multiplier)`. Identical inputs always produce
    /// identical output.
    pub fn award_points(
        &self,
        user_id: DbId,
        resource_id: DbId,
        action_type: ActionType,
        magnitude: u64,
        context: &ScoringContext<'_>,
    ) -> PointsCalculation {
        let base_points = magnitude as f64
            * self.points_per_unit
            * self.action_weights.weight(action_type)
            * self.tier_weights.weight(context.status);
        let multiplier = effective_multiplier(context.multiplier);
        let final_points = clamp_points((base_points * multiplier).round());

        PointsCalculation {
            user_id,
            resource_id,
            resource_name: context.name.to_string(),
            category: context.category.to_string(),
            action_type,
            magnitude,
            status: context.status,
            base_points,
            multiplier,
            final_points,
        }
    }
}

/// Largest award a single change can earn; the leaderboard column is `BIGINT`.
pub const MAX_AWARD: i64 = i64::MAX;

/// Convert a rounded award to an integer, saturating at [`MAX_AWARD`].
fn clamp_points(points: f64) -> i64 {
    if points >= MAX_AWARD as f64 {
        MAX_AWARD
    } else if points > 0.0 {
        points as i64
    } else {
        0
    }
}

/// Resource multipliers that are non-finite or `<= 0` count as 1.0.
pub fn effective_multiplier(multiplier: f64) -> f64 {
    if multiplier.is_finite() && multiplier > 0.0 {
        multiplier
    } else {
        1.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn ctx(status: StatusTier, multiplier: f64) -> ScoringContext<'static> {
        ScoringContext {
            name: "Canned beans",
            category: "food",
            status,
            multiplier,
        }
    }

    /// Flat weights so the arithmetic in a test is easy to follow.
    fn flat_policy() -> ScoringPolicy {
        ScoringPolicy {
            points_per_unit: 1.0,
            action_weights: ActionWeights {
                add: 1.0,
                set: 1.0,
                remove: 1.0,
            },
            tier_weights: TierWeights {
                critical: 1.0,
                below_target: 1.0,
                at_target: 1.0,
                above_target: 1.0,
            },
        }
    }

    // -- action type ----------------------------------------------------------

    #[test]
    fn action_type_derivation() {
        assert_eq!(
            ActionType::for_change(UpdateType::Absolute, 80),
            Some(ActionType::Set)
        );
        assert_eq!(
            ActionType::for_change(UpdateType::Absolute, -80),
            Some(ActionType::Set)
        );
        assert_eq!(
            ActionType::for_change(UpdateType::Relative, 5),
            Some(ActionType::Add)
        );
        assert_eq!(
            ActionType::for_change(UpdateType::Relative, -30),
            Some(ActionType::Remove)
        );
    }

    #[test]
    fn zero_change_has_no_action() {
        assert_eq!(ActionType::for_change(UpdateType::Absolute, 0), None);
        assert_eq!(ActionType::for_change(UpdateType::Relative, 0), None);
    }

    #[test]
    fn action_type_serializes_upper_case() {
        assert_eq!(serde_json::to_value(ActionType::Remove).unwrap(), "REMOVE");
    }

    // -- award ----------------------------------------------------------------

    #[test]
    fn flat_policy_awards_magnitude() {
        let calc = flat_policy().award_points(1, 2, ActionType::Add, 12, &ctx(StatusTier::AtTarget, 1.0));
        assert_eq!(calc.base_points, 12.0);
        assert_eq!(calc.final_points, 12);
        assert_eq!(calc.magnitude, 12);
        assert_eq!(calc.resource_name, "Canned beans");
    }

    #[test]
    fn tier_weight_is_applied() {
        let mut policy = flat_policy();
        policy.tier_weights.critical = 3.0;
        let calc = policy.award_points(1, 2, ActionType::Set, 80, &ctx(StatusTier::Critical, 1.0));
        assert_eq!(calc.base_points, 240.0);
        assert_eq!(calc.final_points, 240);
        assert_eq!(calc.status, StatusTier::Critical);
    }

    #[test]
    fn action_weight_is_applied() {
        let mut policy = flat_policy();
        policy.action_weights.remove = 0.5;
        let calc = policy.award_points(1, 2, ActionType::Remove, 30, &ctx(StatusTier::AtTarget, 1.0));
        assert_eq!(calc.final_points, 15);
    }

    #[test]
    fn multiplier_scales_and_rounds() {
        let calc = flat_policy().award_points(1, 2, ActionType::Add, 5, &ctx(StatusTier::AtTarget, 1.5));
        // 7.5 rounds away from zero.
        assert_eq!(calc.final_points, 8);
        assert_eq!(calc.multiplier, 1.5);
    }

    #[test]
    fn invalid_multiplier_defaults_to_one() {
        for m in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let calc = flat_policy().award_points(1, 2, ActionType::Add, 4, &ctx(StatusTier::AtTarget, m));
            assert_eq!(calc.multiplier, 1.0);
            assert_eq!(calc.final_points, 4);
        }
    }

    #[test]
    fn default_policy_example() {
        // SET of 80 units on a critical resource: 80 * 1 * 0.5 * 2.0 = 80.
        let calc = ScoringPolicy::default().award_points(
            7,
            9,
            ActionType::Set,
            80,
            &ctx(StatusTier::Critical, 1.0),
        );
        assert_eq!(calc.final_points, 80);
    }

    #[test]
    fn award_is_deterministic() {
        let policy = ScoringPolicy::default();
        let a = policy.award_points(3, 4, ActionType::Add, 17, &ctx(StatusTier::BelowTarget, 1.25));
        let b = policy.award_points(3, 4, ActionType::Add, 17, &ctx(StatusTier::BelowTarget, 1.25));
        assert_eq!(a, b);
    }

    #[test]
    fn huge_award_saturates() {
        let calc = ScoringPolicy::default().award_points(
            1,
            2,
            ActionType::Add,
            u64::MAX,
            &ctx(StatusTier::Critical, 1_000.0),
        );
        assert_eq!(calc.final_points, MAX_AWARD);
    }

    #[test]
    fn fractional_award_rounds_to_zero() {
        // 1 unit SET on an over-stocked resource: 1 * 1 * 0.5 * 0.5.
        let calc = ScoringPolicy::default().award_points(
            1,
            2,
            ActionType::Set,
            1,
            &ctx(StatusTier::AboveTarget, 1.0),
        );
        assert_eq!(calc.base_points, 0.25);
        assert_eq!(calc.final_points, 0);
    }

    // -- parsing --------------------------------------------------------------

    #[test]
    fn parse_tier_weights_overrides_listed_tiers() {
        let w = TierWeights::parse("critical=4, above_target=0").unwrap();
        assert_eq!(w.critical, 4.0);
        assert_eq!(w.above_target, 0.0);
        assert_eq!(w.at_target, TierWeights::default().at_target);
    }

    #[test]
    fn parse_empty_keeps_defaults() {
        assert_eq!(TierWeights::parse("").unwrap(), TierWeights::default());
        assert_eq!(ActionWeights::parse(" ").unwrap(), ActionWeights::default());
    }

    #[test]
    fn parse_action_weights() {
        let w = ActionWeights::parse("add=2,set=1,remove=0.25").unwrap();
        assert_eq!(w.weight(ActionType::Add), 2.0);
        assert_eq!(w.weight(ActionType::Set), 1.0);
        assert_eq!(w.weight(ActionType::Remove), 0.25);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_matches!(TierWeights::parse("critical"), Err(CoreError::Validation(_)));
        assert_matches!(TierWeights::parse("critical=abc"), Err(CoreError::Validation(_)));
        assert_matches!(TierWeights::parse("critical=-1"), Err(CoreError::Validation(_)));
        assert_matches!(TierWeights::parse("urgent=2"), Err(CoreError::Validation(_)));
        assert_matches!(ActionWeights::parse("restock=2"), Err(CoreError::Validation(_)));
    }
}
