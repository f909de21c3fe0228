//! Battle tier table module.
//!
//! Maps creature types to a battle tier (0, 1 or 2). The tier selects the
//! aptitude cap vector a pet of that type can legitimately reach.

use crate::error::DecayError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Offset added to raw table ids to form live creature type ids.
pub const TYPE_ID_OFFSET: i64 = 100_000;

/// Number of battle tiers.
pub const TIER_COUNT: usize = 3;

/// A resolved battle tier, always in `0..TIER_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Tier(u8);

impl Tier {
    /// Build a tier from an integer, rejecting anything outside `0..=2`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use petdecay::Tier;
    ///
    /// assert_eq!(Tier::new(2).map(|t| t.index()), Some(2));
    /// assert_eq!(Tier::new(3), None);
    /// assert_eq!(Tier::new(-1), None);
    /// ```
    pub fn new(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .filter(|v| *v < TIER_COUNT)
            .map(|v| Tier(v as u8))
    }

    /// Row index into the cap table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<i64> for Tier {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Tier::new(value).ok_or_else(|| format!("battle tier out of range: {value}"))
    }
}

impl From<Tier> for i64 {
    fn from(tier: Tier) -> Self {
        tier.0 as i64
    }
}

/// One `(raw_id, tier)` entry. `raw_id` is stored without [`TYPE_ID_OFFSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierEntry {
    pub raw_id: i64,
    pub tier: i64,
}

/// Static list of creature type tiers.
///
/// Lookup is a linear scan; the table is small and read-only.
///
/// # Examples
///
/// ```rust
/// use petdecay::tier::{BattleTierTable, TierEntry};
///
/// let table = BattleTierTable::new(vec![
///     TierEntry { raw_id: 2001, tier: 0 },
///     TierEntry { raw_id: 2044, tier: 2 },
/// ]).unwrap();
///
/// assert_eq!(table.resolve_tier(102044).map(|t| t.index()), Some(2));
/// assert_eq!(table.resolve_tier(2044), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleTierTable {
    entries: Vec<TierEntry>,
}

impl BattleTierTable {
    /// Build a table, validating every tier and rejecting duplicate ids.
    pub fn new(entries: Vec<TierEntry>) -> Result<Self, DecayError> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    pub(crate) fn from_entries_unchecked(entries: Vec<TierEntry>) -> Self {
        Self { entries }
    }

    /// Check that every tier is in range and every raw id is unique.
    pub fn validate(&self) -> Result<(), DecayError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if Tier::new(entry.tier).is_none() {
                return Err(DecayError::InvalidTier {
                    raw_id: entry.raw_id,
                    tier: entry.tier,
                });
            }
            if !seen.insert(entry.raw_id) {
                return Err(DecayError::DuplicateTierEntry(entry.raw_id));
            }
        }
        Ok(())
    }

    /// Resolve the tier of a live creature type id.
    ///
    /// Returns `None` when no entry matches; the caller must then treat
    /// the decay as not computable.
    pub fn resolve_tier(&self, type_id: i64) -> Option<Tier> {
        self.entries
            .iter()
            .find(|entry| entry.raw_id.checked_add(TYPE_ID_OFFSET) == Some(type_id))
            .and_then(|entry| Tier::new(entry.tier))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
