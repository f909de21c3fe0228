//! Excess aptitude decay engine.
//!
//! Pets can carry aptitude above their tier cap (or above a floor the
//! player saved earlier). That excess erodes over time: every elapsed
//! calendar year halves what survives, rounding the removed part down,
//! and never drops below the organic value. The engine splits each
//! tracked total into organic value and surviving excess, then unwinds
//! the decayed amount from dependent combat fields.
//!
//! Exempt creatures, missing baselines and unresolvable tiers are soft
//! skips: the record is left untouched and the report says why.

use crate::caps::CapVector;
use crate::context::{BaselineSnapshot, ResolutionContext};
use crate::error::DecayError;
use crate::formula::ResolvedTargets;
use crate::record::PetStatRecord;
use crate::report::{DecayReport, SkipReason, StatDecay};
use crate::tables::DecayTables;
use crate::tier::Tier;
use crate::ATTRIBUTE_COUNT;
use std::sync::OnceLock;
use tracing::{debug, trace, warn};

/// A decayed copy of a record together with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayOutcome {
    pub record: PetStatRecord,
    pub report: DecayReport,
}

/// Applies excess decay using a fixed set of tables.
///
/// # Examples
///
/// ```rust
/// use petdecay::{ExcessStatEngine, PetStatRecord, ResolutionContext};
/// use chrono::NaiveDate;
///
/// let engine = ExcessStatEngine::default();
/// let pet = PetStatRecord::new(102001).with_field("gong_ji_zz", 1800.0);
/// let ctx = ResolutionContext::new()
///     .with_baseline("1500|0|0|0|0|0")
///     .with_last_checked_year(2023)
///     .on_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
///
/// let outcome = engine.apply(&pet, &ctx);
/// assert_eq!(outcome.record.get("gong_ji_zz"), Some(1550.0));
/// assert_eq!(outcome.record.get("attack_ext"), Some(125.0));
/// // the input is untouched
/// assert_eq!(pet.get("gong_ji_zz"), Some(1800.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExcessStatEngine {
    tables: DecayTables,
}

impl ExcessStatEngine {
    /// Create an engine over validated tables.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure of `tables`.
    pub fn new(tables: DecayTables) -> Result<Self, DecayError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &DecayTables {
        &self.tables
    }

    /// Decay a copy of `record`, leaving the input as it was.
    ///
    /// Feed the same pre-decay record on every call; feeding the output
    /// back in would split its already reduced totals a second time.
    pub fn apply(&self, record: &PetStatRecord, ctx: &ResolutionContext) -> DecayOutcome {
        let mut record = record.clone();
        let report = self.apply_in_place(&mut record, ctx);
        DecayOutcome { record, report }
    }

    /// Decay `record` in place.
    ///
    /// For every tracked statistic present in the record, the total field
    /// is set to its organic value and the excess field to the excess left
    /// after decay. Cascades into dependent fields follow for any amount
    /// actually decayed.
    pub fn apply_in_place(
        &self,
        record: &mut PetStatRecord,
        ctx: &ResolutionContext,
    ) -> DecayReport {
        if self
            .tables
            .shenshou
            .is_exempt(&record.type_id, ctx.exemption_override)
        {
            return skip(record, SkipReason::Exempt);
        }
        let Some(baseline) = ctx.baseline() else {
            return skip(record, SkipReason::MissingBaseline);
        };
        let Some(tier) = self.resolve_tier(record, ctx) else {
            return skip(record, SkipReason::UnresolvedTier);
        };
        let Some(selection) = self.tables.caps.select(tier, record.name.as_deref()) else {
            return skip(record, SkipReason::UnresolvedTier);
        };

        let elapsed_years = ctx.elapsed_years();
        if elapsed_years < 0 {
            warn!(
                type_id = %record.type_id,
                last_checked = ctx.last_checked_year(),
                current = ctx.current_year(),
                "Last check lies in the future, no decay applied"
            );
        }

        let caps = *selection.caps;
        let mut report = DecayReport {
            skipped: None,
            tier: Some(tier),
            override_prefix: selection.override_prefix.map(str::to_string),
            elapsed_years,
            stats: Vec::new(),
        };

        let targets = self.tables.formulas.fields.resolve(record);
        for index in 0..ATTRIBUTE_COUNT {
            if let Some(stat) =
                self.decay_stat(record, ctx, &caps, &baseline, &targets, index, elapsed_years)
            {
                report.stats.push(stat);
            }
        }

        debug!(
            type_id = %record.type_id,
            tier = tier.index(),
            elapsed_years,
            decayed = report.total_decayed(),
            "Excess decay applied"
        );
        report
    }

    /// Tier from a non-negative override, else from the battle tier table.
    ///
    /// An override outside `0..=2` yields `None`.
    pub fn resolve_tier(&self, record: &PetStatRecord, ctx: &ResolutionContext) -> Option<Tier> {
        match ctx.tier_override() {
            Some(tier) => Tier::new(tier),
            None => self.tables.tiers.resolve_tier(record.type_id.as_int()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn decay_stat(
        &self,
        record: &mut PetStatRecord,
        ctx: &ResolutionContext,
        caps: &CapVector,
        baseline: &BaselineSnapshot,
        targets: &ResolvedTargets,
        index: usize,
        elapsed_years: i64,
    ) -> Option<StatDecay> {
        let total_field = ctx.total_attribute_names.get(index)?;
        let excess_field = ctx.attribute_names.get(index)?;
        let original_total = record.get(total_field.as_str())?;

        let ceiling = caps[index].max(baseline.floor(index));
        let excess_before = (original_total - ceiling).max(0.0);
        let organic = original_total - excess_before;
        record.set(total_field.clone(), organic);

        let excess_after = compound_decay(excess_before, elapsed_years);
        record.set(excess_field.clone(), excess_after);

        let decayed = excess_before - excess_after;
        let cascade = if decayed > 0.0 {
            self.tables
                .formulas
                .apply_resolved(record, index, decayed, targets)
        } else {
            Vec::new()
        };

        trace!(
            field = %total_field,
            original_total,
            organic,
            excess_before,
            excess_after,
            "Statistic processed"
        );

        Some(StatDecay {
            index,
            total_field: total_field.clone(),
            excess_field: excess_field.clone(),
            original_total,
            organic,
            excess_before,
            excess_after,
            cascade,
        })
    }
}

fn skip(record: &PetStatRecord, reason: SkipReason) -> DecayReport {
    debug!(type_id = %record.type_id, %reason, "Excess decay skipped");
    DecayReport::skipped(reason)
}

/// Excess surviving `elapsed_years` of yearly halving.
///
/// Each year removes `floor(excess / 2)`; the excess never goes below
/// zero. Non-positive `elapsed_years` leaves it unchanged.
///
/// # Examples
///
/// ```rust
/// use petdecay::engine::compound_decay;
///
/// assert_eq!(compound_decay(250.0, 0), 250.0);
/// assert_eq!(compound_decay(250.0, 1), 125.0);
/// assert_eq!(compound_decay(250.0, 2), 63.0);
/// assert_eq!(compound_decay(250.0, -3), 250.0);
/// ```
pub fn compound_decay(excess: f64, elapsed_years: i64) -> f64 {
    let mut excess = excess.max(0.0);
    for _ in 0..elapsed_years.max(0) {
        if excess <= 0.0 {
            break;
        }
        let removed = (excess / 2.0).floor();
        // below 2 nothing more is ever removed
        if removed <= 0.0 {
            break;
        }
        excess = (excess - removed).max(0.0);
    }
    excess
}

/// Decay `record` in place with the builtin tables.
pub fn apply_excess_decay(record: &mut PetStatRecord, ctx: &ResolutionContext) -> DecayReport {
    static BUILTIN: OnceLock<ExcessStatEngine> = OnceLock::new();
    BUILTIN
        .get_or_init(ExcessStatEngine::default)
        .apply_in_place(record, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx(last: i32, now: i32) -> ResolutionContext {
        ResolutionContext::new()
            .with_baseline("1500|1400|1400|1500|5000|2900")
            .with_last_checked_year(last)
            .on_date(NaiveDate::from_ymd_opt(now, 7, 1).unwrap())
    }

    #[test]
    fn test_compound_decay_sequence() {
        // 250 -> 125 -> 63 -> 32 -> 16 -> 8 -> 4 -> 2 -> 1 -> 1
        assert_eq!(compound_decay(250.0, 3), 32.0);
        assert_eq!(compound_decay(250.0, 8), 1.0);
        assert_eq!(compound_decay(250.0, 50), 1.0);
        assert_eq!(compound_decay(0.0, 5), 0.0);
    }

    #[test]
    fn test_compound_decay_huge_elapsed_terminates() {
        assert_eq!(compound_decay(1.0, i64::MAX), 1.0);
    }

    #[test]
    fn test_scenario_a_single_year() {
        let engine = ExcessStatEngine::default();
        let pet = PetStatRecord::new(102001)
            .with_field("gong_ji_zz", 1800.0)
            .with_field("pet_grade", 100.0)
            .with_field("cheng_zhang", 1.2)
            .with_field("attack", 1000.0);

        let outcome = engine.apply(&pet, &ctx(2023, 2024));
        let stat = outcome.report.stat(0).unwrap();
        assert_eq!(stat.excess_before, 250.0);
        assert_eq!(stat.excess_after, 125.0);
        assert_eq!(outcome.record.get("gong_ji_zz"), Some(1550.0));
        assert_eq!(outcome.record.get("attack_ext"), Some(125.0));
        // ceil(125 * 100 * 2/1000 * 1.3 * 4/3) = 44
        assert_eq!(outcome.record.get("attack"), Some(956.0));
        assert_eq!(stat.cascade.len(), 1);
    }

    #[test]
    fn test_scenario_b_no_elapsed_years() {
        let engine = ExcessStatEngine::default();
        let pet = PetStatRecord::new(102001)
            .with_field("gong_ji_zz", 1800.0)
            .with_field("pet_grade", 100.0)
            .with_field("cheng_zhang", 1.2)
            .with_field("attack", 1000.0);

        let outcome = engine.apply(&pet, &ctx(2024, 2024));
        assert_eq!(outcome.record.get("attack_ext"), Some(250.0));
        assert_eq!(outcome.record.get("gong_ji_zz"), Some(1550.0));
        assert_eq!(outcome.record.get("attack"), Some(1000.0));
        assert!(outcome.report.stat(0).unwrap().cascade.is_empty());
    }

    #[test]
    fn test_baseline_floor_above_cap() {
        let engine = ExcessStatEngine::default();
        let pet = PetStatRecord::new(102001).with_field("ti_li_zz", 5600.0);
        // stamina cap 5500, floor 5000 -> ceiling 5500, excess 100
        let outcome = engine.apply(&pet, &ctx(2024, 2024));
        assert_eq!(outcome.record.get("physical_ext"), Some(100.0));

        let pet = PetStatRecord::new(102001).with_field("fang_yu_zz", 1580.0);
        let ctx = ResolutionContext::new()
            .with_baseline("0|1600|0|0|0|0")
            .with_last_checked_year(2024)
            .on_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        // floor 1600 exceeds cap 1550 and the total
        let outcome = engine.apply(&pet, &ctx);
        assert_eq!(outcome.record.get("fang_yu_zz"), Some(1580.0));
        assert_eq!(outcome.record.get("defence_ext"), Some(0.0));
    }

    #[test]
    fn test_missing_total_fields_skipped() {
        let engine = ExcessStatEngine::default();
        let pet = PetStatRecord::new(102001).with_field("su_du_zz", 1500.0);
        let outcome = engine.apply(&pet, &ctx(2020, 2024));
        assert_eq!(outcome.report.stats.len(), 1);
        assert_eq!(outcome.report.stats[0].index, 2);
        assert!(!outcome.record.contains("attack_ext"));
    }

    #[test]
    fn test_tier_override_out_of_range_aborts() {
        let engine = ExcessStatEngine::default();
        let pet = PetStatRecord::new(102001).with_field("gong_ji_zz", 1800.0);
        let mut record = pet.clone();
        let report = engine.apply_in_place(&mut record, &ctx(2020, 2024).with_tier(5));
        assert_eq!(report.skipped, Some(SkipReason::UnresolvedTier));
        assert_eq!(record, pet);
    }

    #[test]
    fn test_negative_tier_override_falls_back_to_table() {
        let engine = ExcessStatEngine::default();
        let pet = PetStatRecord::new(102044);
        let tier = engine.resolve_tier(&pet, &ctx(2020, 2024).with_tier(-1));
        assert_eq!(tier, Tier::new(2));
    }

    #[test]
    fn test_builtin_entry_point() {
        let mut pet = PetStatRecord::new(102001).with_field("duo_shan_zz", 1900.0);
        let report = apply_excess_decay(&mut pet, &ctx(2023, 2024));
        assert!(report.is_applied());
        // dodge cap 1800: excess 100 -> 50
        assert_eq!(pet.get("duo_shan_zz"), Some(1800.0));
        assert_eq!(pet.get("avoid_ext"), Some(50.0));
    }
}
