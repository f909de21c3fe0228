//! Per-call resolution context.
//!
//! The `ResolutionContext` carries everything the engine needs besides
//! the record itself: which fields hold the tracked aptitudes, the saved
//! baseline, tier and exemption overrides, and the time basis for decay.
//! It is built fresh for every call from caller options merged with
//! defaults.

use crate::error::DecayError;
use crate::field::{names, FieldName};
use crate::ATTRIBUTE_COUNT;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Year assumed for the previous decay evaluation when none is recorded.
pub const DEFAULT_LAST_CHECKED_YEAR: i32 = 2017;

/// Separator between values of a saved baseline snapshot.
pub const BASELINE_DELIMITER: char = '|';

/// Default excess field names, in attack/defence/speed/dodge/stamina/magic order.
pub const DEFAULT_ATTRIBUTE_NAMES: [&str; ATTRIBUTE_COUNT] = [
    "attack_ext",
    "defence_ext",
    "speed_ext",
    "avoid_ext",
    "physical_ext",
    "magic_ext",
];

/// Default total aptitude field names, index-aligned with the excess names.
pub const DEFAULT_TOTAL_ATTRIBUTE_NAMES: [&str; ATTRIBUTE_COUNT] = [
    "gong_ji_zz",
    "fang_yu_zz",
    "su_du_zz",
    "duo_shan_zz",
    "ti_li_zz",
    "fa_li_zz",
];

/// Per-statistic floor values saved at a prior snapshot.
///
/// # Examples
///
/// ```rust
/// use petdecay::BaselineSnapshot;
///
/// let snapshot = BaselineSnapshot::parse("1500|1400|x||5000|2900").unwrap();
/// assert_eq!(snapshot.floor(0), 1500.0);
/// assert_eq!(snapshot.floor(2), 0.0); // unparseable reads as 0
/// assert_eq!(snapshot.floor(9), 0.0); // missing reads as 0
/// assert!(BaselineSnapshot::parse("  ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSnapshot {
    floors: Vec<Option<f64>>,
}

impl BaselineSnapshot {
    /// Parse a pipe-delimited snapshot. Blank input means no snapshot.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let floors = raw
            .split(BASELINE_DELIMITER)
            .map(|part| part.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();
        Some(Self { floors })
    }

    /// Floor for statistic `index`; absent or unparseable entries are 0.
    pub fn floor(&self, index: usize) -> f64 {
        self.floors.get(index).copied().flatten().unwrap_or(0.0)
    }
}

/// Caller-supplied inputs for one engine call.
///
/// # Examples
///
/// ```rust
/// use petdecay::ResolutionContext;
/// use chrono::NaiveDate;
///
/// let ctx = ResolutionContext::new()
///     .with_baseline("1500|1400|1400|1500|5000|2900")
///     .with_last_checked_year(2022)
///     .on_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
///
/// assert_eq!(ctx.elapsed_years(), 2);
/// assert_eq!(ctx.baseline().unwrap().floor(4), 5000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionContext {
    /// Fields receiving the remaining excess per statistic.
    pub attribute_names: Vec<FieldName>,

    /// Fields holding the total aptitude per statistic.
    pub total_attribute_names: Vec<FieldName>,

    /// Pipe-delimited floors from a prior snapshot.
    pub saved_baseline: Option<String>,

    /// Explicit battle tier; negative values are ignored.
    pub tier_override: Option<i64>,

    /// Year of the previous decay evaluation; 0 or absent means 2017.
    pub last_checked_year: Option<i32>,

    /// Short-circuits the shenshou lookup when set.
    pub exemption_override: Option<bool>,

    /// "Now" for elapsed-year computation; absent means today (UTC).
    pub evaluation_date: Option<NaiveDate>,
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self {
            attribute_names: names(DEFAULT_ATTRIBUTE_NAMES),
            total_attribute_names: names(DEFAULT_TOTAL_ATTRIBUTE_NAMES),
            saved_baseline: None,
            tier_override: None,
            last_checked_year: None,
            exemption_override: None,
            evaluation_date: None,
        }
    }
}

impl ResolutionContext {
    /// Create a context with default field names and no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a context from option JSON, filling omitted keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, DecayError> {
        let ctx: Self = serde_json::from_str(json)?;
        ctx.validate()?;
        Ok(ctx)
    }

    /// Check that both name lists hold one entry per tracked statistic.
    pub fn validate(&self) -> Result<(), DecayError> {
        if self.attribute_names.len() != ATTRIBUTE_COUNT {
            return Err(DecayError::AttributeCount {
                what: "attribute_names",
                found: self.attribute_names.len(),
            });
        }
        if self.total_attribute_names.len() != ATTRIBUTE_COUNT {
            return Err(DecayError::AttributeCount {
                what: "total_attribute_names",
                found: self.total_attribute_names.len(),
            });
        }
        Ok(())
    }

    pub fn with_baseline(mut self, snapshot: impl Into<String>) -> Self {
        self.saved_baseline = Some(snapshot.into());
        self
    }

    pub fn with_tier(mut self, tier: i64) -> Self {
        self.tier_override = Some(tier);
        self
    }

    pub fn with_last_checked_year(mut self, year: i32) -> Self {
        self.last_checked_year = Some(year);
        self
    }

    pub fn with_exemption(mut self, exempt: bool) -> Self {
        self.exemption_override = Some(exempt);
        self
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.evaluation_date = Some(date);
        self
    }

    /// Replace both field-name lists.
    ///
    /// # Errors
    ///
    /// Returns [`DecayError::AttributeCount`] unless both lists hold six names.
    pub fn with_attribute_names<E, T>(mut self, ext: E, total: T) -> Result<Self, DecayError>
    where
        E: IntoIterator,
        E::Item: Into<FieldName>,
        T: IntoIterator,
        T::Item: Into<FieldName>,
    {
        self.attribute_names = ext.into_iter().map(Into::into).collect();
        self.total_attribute_names = total.into_iter().map(Into::into).collect();
        self.validate()?;
        Ok(self)
    }

    /// Parsed baseline, or `None` when absent or blank.
    pub fn baseline(&self) -> Option<BaselineSnapshot> {
        self.saved_baseline.as_deref().and_then(BaselineSnapshot::parse)
    }

    /// Tier override if present and non-negative.
    pub fn tier_override(&self) -> Option<i64> {
        self.tier_override.filter(|t| *t >= 0)
    }

    pub fn last_checked_year(&self) -> i32 {
        match self.last_checked_year {
            Some(year) if year != 0 => year,
            _ => DEFAULT_LAST_CHECKED_YEAR,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.evaluation_date
            .unwrap_or_else(|| Utc::now().date_naive())
            .year()
    }

    /// Whole calendar years since the last check. May be negative.
    pub fn elapsed_years(&self) -> i64 {
        i64::from(self.current_year()) - i64::from(self.last_checked_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, 6, 15).unwrap()
    }

    #[test]
    fn test_default_last_checked_year() {
        let ctx = ResolutionContext::new().on_date(date(2020));
        assert_eq!(ctx.last_checked_year(), 2017);
        assert_eq!(ctx.elapsed_years(), 3);

        let ctx = ctx.with_last_checked_year(0);
        assert_eq!(ctx.last_checked_year(), 2017);
    }

    #[test]
    fn test_negative_elapsed_years() {
        let ctx = ResolutionContext::new()
            .with_last_checked_year(2030)
            .on_date(date(2028));
        assert_eq!(ctx.elapsed_years(), -2);
    }

    #[test]
    fn test_negative_tier_override_ignored() {
        let ctx = ResolutionContext::new().with_tier(-1);
        assert_eq!(ctx.tier_override(), None);
        assert_eq!(ResolutionContext::new().with_tier(2).tier_override(), Some(2));
    }

    #[test]
    fn test_blank_baseline_is_absent() {
        assert!(ResolutionContext::new().baseline().is_none());
        assert!(ResolutionContext::new().with_baseline("").baseline().is_none());
    }

    #[test]
    fn test_attribute_names_must_be_six() {
        let err = ResolutionContext::new()
            .with_attribute_names(["a", "b"], DEFAULT_TOTAL_ATTRIBUTE_NAMES)
            .unwrap_err();
        assert!(matches!(
            err,
            DecayError::AttributeCount {
                what: "attribute_names",
                found: 2
            }
        ));
    }

    #[test]
    fn test_from_json_merges_defaults() {
        let ctx = ResolutionContext::from_json(
            r#"{"saved_baseline": "1|2|3|4|5|6", "tier_override": 1, "evaluation_date": "2019-01-01"}"#,
        )
        .unwrap();
        assert_eq!(ctx.attribute_names[0].as_str(), "attack_ext");
        assert_eq!(ctx.tier_override(), Some(1));
        assert_eq!(ctx.elapsed_years(), 2);
        assert_eq!(ctx.baseline().unwrap().floor(5), 6.0);
    }
}
