//! Static decay configuration.
//!
//! `DecayTables` bundles every read-only lookup the engine consults.
//! The builtin game data is available through `Default`; callers and
//! tests may substitute any section through JSON or by construction.

use crate::caps::{CapTable, CapVector, PrefixOverride};
use crate::error::DecayError;
use crate::formula::DecayFormulaTable;
use crate::shenshou::ShenshouClassifier;
use crate::tier::{BattleTierTable, TierEntry};
use serde::{Deserialize, Serialize};

/// Aptitude caps by battle tier.
const TIER_CAPS: [CapVector; 3] = [
    [1550.0, 1550.0, 1550.0, 1800.0, 5500.0, 3050.0],
    [1600.0, 1600.0, 1600.0, 1800.0, 6000.0, 3500.0],
    [1650.0, 1650.0, 1650.0, 1850.0, 6500.0, 3600.0],
];

/// Rare variant whose caps do not follow its tier.
const RARE_PREFIX: &str = "超级泡泡";
const RARE_CAPS: CapVector = [1620.0, 1620.0, 1620.0, 1800.0, 6200.0, 3200.0];

/// `(raw_id, tier)` pairs, ids without the live offset.
const TIER_ENTRIES: &[(i64, i64)] = &[
    (2001, 0),
    (2002, 0),
    (2003, 0),
    (2004, 0),
    (2011, 0),
    (2012, 0),
    (2013, 0),
    (2014, 0),
    (2030, 1),
    (2031, 1),
    (2032, 1),
    (2033, 1),
    (2034, 1),
    (2035, 1),
    (2040, 2),
    (2041, 2),
    (2042, 2),
    (2043, 2),
    (2044, 2),
    (2045, 2),
];

/// Shenshou type ids, already offset.
const SHENSHOU_IDS: &[i64] = &[
    102005, 102006, 102007, 102008, 102009, 102010, 102051, 102052, 102053, 102054, 102055,
    102056, 102057, 102058,
];

/// Every static table the engine reads.
///
/// # Examples
///
/// ```rust
/// use petdecay::DecayTables;
///
/// // The caps section is replaced as a whole (including its prefix
/// // overrides, which default to none); omitted sections keep builtin data.
/// let tables = DecayTables::from_json(r#"{
///     "caps": { "tiers": [[1,1,1,1,1,1],[2,2,2,2,2,2],[3,3,3,3,3,3]] }
/// }"#).unwrap();
///
/// assert!(!tables.tiers.is_empty());
/// assert!(!tables.shenshou.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayTables {
    pub tiers: BattleTierTable,
    pub shenshou: ShenshouClassifier,
    pub caps: CapTable,
    pub formulas: DecayFormulaTable,
}

impl Default for DecayTables {
    fn default() -> Self {
        Self {
            tiers: builtin_tiers(),
            shenshou: ShenshouClassifier::new(SHENSHOU_IDS.iter().copied()),
            caps: builtin_caps(),
            formulas: DecayFormulaTable::default(),
        }
    }
}

impl DecayTables {
    /// Parse tables from JSON; omitted sections use builtin data.
    ///
    /// A section that is present replaces its builtin counterpart whole;
    /// fields omitted inside it take that section's serde defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DecayError::Json`] for malformed input, or the first
    /// validation failure of any section.
    pub fn from_json(json: &str) -> Result<Self, DecayError> {
        let tables: Self = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Like [`from_json`](Self::from_json) for an already parsed value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DecayError> {
        let tables: Self = serde_json::from_value(value)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn validate(&self) -> Result<(), DecayError> {
        self.tiers.validate()?;
        self.caps.validate()?;
        self.formulas.validate()?;
        Ok(())
    }
}

fn builtin_tiers() -> BattleTierTable {
    let entries = TIER_ENTRIES
        .iter()
        .map(|&(raw_id, tier)| TierEntry { raw_id, tier })
        .collect();
    // builtin entries are all in range and unique; bypass validation
    BattleTierTable::from_entries_unchecked(entries)
}

fn builtin_caps() -> CapTable {
    CapTable::from_parts_unchecked(
        TIER_CAPS.to_vec(),
        vec![PrefixOverride {
            prefix: RARE_PREFIX.to_string(),
            caps: RARE_CAPS,
        }],
    )
}
