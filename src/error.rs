//! Error types for table and context construction.
//!
//! The decay computation itself never fails; abnormal inputs are soft
//! skips recorded in the [`DecayReport`](crate::report::DecayReport).
//! `DecayError` covers the configuration boundary only.

use thiserror::Error;

/// Errors that can occur while building decay tables or a resolution context.
///
/// # Examples
///
/// ```rust
/// use petdecay::DecayError;
///
/// let err = DecayError::AttributeCount { what: "attribute_names", found: 4 };
/// assert!(err.to_string().contains("attribute_names"));
/// ```
#[derive(Debug, Error)]
pub enum DecayError {
    /// Table JSON could not be parsed.
    #[error("Invalid decay table JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A per-attribute list does not hold exactly six entries.
    #[error("Expected 6 entries in {what}, found {found}")]
    AttributeCount { what: &'static str, found: usize },

    /// A battle tier table entry maps to a tier outside 0..=2.
    #[error("Invalid battle tier {tier} for raw type id {raw_id}")]
    InvalidTier { raw_id: i64, tier: i64 },

    /// The same raw type id appears twice in the battle tier table.
    #[error("Duplicate battle tier entry for raw type id {0}")]
    DuplicateTierEntry(i64),

    /// The cap table does not define exactly three tiers.
    #[error("Expected 3 cap tiers, found {0}")]
    CapTierCount(usize),

    /// A name-prefix cap override has an empty prefix.
    #[error("Cap override prefix must not be empty")]
    EmptyPrefix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecayError::InvalidTier { raw_id: 2001, tier: 7 };
        let display = err.to_string();
        assert!(display.contains("2001"));
        assert!(display.contains('7'));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: DecayError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid decay table JSON"));
    }
}
