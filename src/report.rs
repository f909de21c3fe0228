//! Decay report module.
//!
//! A `DecayReport` describes what one engine call did to a record: why
//! it was skipped, or which tier and caps applied and how each tracked
//! statistic was split and decayed. Rendering code reads it to show
//! current against decayed values without diffing records.

use crate::field::FieldName;
use crate::formula::Reduction;
use crate::tier::Tier;
use serde::{Deserialize, Serialize};

/// Why an engine call left the record untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The creature type is shenshou, or the caller said so.
    Exempt,
    /// No saved baseline snapshot was supplied.
    MissingBaseline,
    /// No valid tier from the override or the battle tier table.
    UnresolvedTier,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::Exempt => "exempt creature type",
            SkipReason::MissingBaseline => "no saved baseline",
            SkipReason::UnresolvedTier => "battle tier unresolved",
        };
        f.write_str(s)
    }
}

/// Breakdown for one tracked statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDecay {
    /// Position in the attribute name lists.
    pub index: usize,

    pub total_field: FieldName,
    pub excess_field: FieldName,

    /// Total before the call.
    pub original_total: f64,

    /// Non-excess part written back to the total field.
    pub organic: f64,

    pub excess_before: f64,

    /// Excess surviving the yearly decay, written to the excess field.
    pub excess_after: f64,

    /// Dependent-field reductions triggered by the decayed amount.
    pub cascade: Vec<Reduction>,
}

impl StatDecay {
    /// Excess removed by this call.
    pub fn decayed(&self) -> f64 {
        self.excess_before - self.excess_after
    }
}

/// Result summary of one engine call.
///
/// # Examples
///
/// ```rust
/// use petdecay::report::{DecayReport, SkipReason};
///
/// let report = DecayReport::skipped(SkipReason::MissingBaseline);
/// assert!(!report.is_applied());
/// assert_eq!(report.total_decayed(), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecayReport {
    /// Set when the call was a no-op.
    pub skipped: Option<SkipReason>,

    pub tier: Option<Tier>,

    /// Name prefix whose override caps were used instead of the tier row.
    pub override_prefix: Option<String>,

    pub elapsed_years: i64,

    /// Processed statistics, in index order. Statistics whose total field
    /// is absent from the record are not listed.
    pub stats: Vec<StatDecay>,
}

impl DecayReport {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    pub fn is_applied(&self) -> bool {
        self.skipped.is_none()
    }

    /// Breakdown for statistic `index`, if it was processed.
    pub fn stat(&self, index: usize) -> Option<&StatDecay> {
        self.stats.iter().find(|s| s.index == index)
    }

    /// Sum of excess removed across all statistics.
    pub fn total_decayed(&self) -> f64 {
        self.stats.iter().map(StatDecay::decayed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(index: usize, before: f64, after: f64) -> StatDecay {
        StatDecay {
            index,
            total_field: "gong_ji_zz".into(),
            excess_field: "attack_ext".into(),
            original_total: 1800.0,
            organic: 1550.0,
            excess_before: before,
            excess_after: after,
            cascade: Vec::new(),
        }
    }

    #[test]
    fn test_report_totals() {
        let report = DecayReport {
            stats: vec![stat(0, 250.0, 125.0), stat(4, 40.0, 10.0)],
            ..DecayReport::default()
        };
        assert!(report.is_applied());
        assert_eq!(report.total_decayed(), 155.0);
        assert_eq!(report.stat(4).unwrap().decayed(), 30.0);
        assert!(report.stat(1).is_none());
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Exempt.to_string(), "exempt creature type");
    }

    #[test]
    fn test_report_serializes_reason_snake_case() {
        let json = serde_json::to_value(DecayReport::skipped(SkipReason::UnresolvedTier)).unwrap();
        assert_eq!(json["skipped"], "unresolved_tier");
    }
}
