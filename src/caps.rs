//! Aptitude cap table module.
//!
//! Holds the per-tier cap vectors plus literal overrides for rare
//! variants recognised by display-name prefix.

use crate::error::DecayError;
use crate::tier::{Tier, TIER_COUNT};
use crate::ATTRIBUTE_COUNT;
use serde::{Deserialize, Serialize};

/// One aptitude cap per tracked statistic.
pub type CapVector = [f64; ATTRIBUTE_COUNT];

/// Cap vector applied to every pet whose name starts with `prefix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixOverride {
    pub prefix: String,
    pub caps: CapVector,
}

/// Which cap vector was selected for a pet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapSelection<'a> {
    pub caps: &'a CapVector,
    /// Prefix of the override that applied, if any.
    pub override_prefix: Option<&'a str>,
}

/// Tier-indexed cap matrix with name-prefix overrides.
///
/// # Examples
///
/// ```rust
/// use petdecay::caps::{CapTable, PrefixOverride};
/// use petdecay::Tier;
///
/// let table = CapTable::new(
///     vec![[1.0; 6], [2.0; 6], [3.0; 6]],
///     vec![PrefixOverride { prefix: "Rare".into(), caps: [9.0; 6] }],
/// ).unwrap();
///
/// let tier = Tier::new(1).unwrap();
/// assert_eq!(table.select(tier, None).unwrap().caps, &[2.0; 6]);
/// assert_eq!(table.select(tier, Some("Rare Fox")).unwrap().caps, &[9.0; 6]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapTable {
    tiers: Vec<CapVector>,
    #[serde(default)]
    prefix_overrides: Vec<PrefixOverride>,
}

impl CapTable {
    pub fn new(
        tiers: Vec<CapVector>,
        prefix_overrides: Vec<PrefixOverride>,
    ) -> Result<Self, DecayError> {
        let table = Self {
            tiers,
            prefix_overrides,
        };
        table.validate()?;
        Ok(table)
    }

    pub(crate) fn from_parts_unchecked(
        tiers: Vec<CapVector>,
        prefix_overrides: Vec<PrefixOverride>,
    ) -> Self {
        Self {
            tiers,
            prefix_overrides,
        }
    }

    pub fn validate(&self) -> Result<(), DecayError> {
        if self.tiers.len() != TIER_COUNT {
            return Err(DecayError::CapTierCount(self.tiers.len()));
        }
        if self.prefix_overrides.iter().any(|o| o.prefix.is_empty()) {
            return Err(DecayError::EmptyPrefix);
        }
        Ok(())
    }

    /// Pick the cap vector for a pet.
    ///
    /// A matching name prefix overrides the tier row; the first matching
    /// override wins. Returns `None` only for a table that skipped
    /// validation and lacks the tier's row.
    pub fn select(&self, tier: Tier, name: Option<&str>) -> Option<CapSelection<'_>> {
        let matched = name.and_then(|name| {
            self.prefix_overrides
                .iter()
                .find(|o| name.starts_with(o.prefix.as_str()))
        });

        match matched {
            Some(o) => Some(CapSelection {
                caps: &o.caps,
                override_prefix: Some(o.prefix.as_str()),
            }),
            None => self.tiers.get(tier.index()).map(|caps| CapSelection {
                caps,
                override_prefix: None,
            }),
        }
    }
}
