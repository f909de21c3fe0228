//! Record field names.
//!
//! Record layouts differ between decoders, so the engine hardcodes no
//! field names; every name arrives through configuration as a
//! `FieldName` shared between tables, context and records.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Shared, cheaply cloned name of one numeric record field.
///
/// Serializes as a plain string and borrows as `&str`, so record maps
/// keyed by `FieldName` can be queried with string slices.
///
/// ```rust
/// use petdecay::FieldName;
///
/// let atk: FieldName = "attack".into();
/// assert_eq!(atk, FieldName::from(String::from("attack")));
/// assert_eq!(atk.as_str(), "attack");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldName(Arc<str>);

impl FieldName {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for FieldName {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<FieldName> for String {
    fn from(name: FieldName) -> Self {
        name.0.as_ref().to_owned()
    }
}

// Arc<str> hashes and orders like str, so map lookups by &str stay consistent.
impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build a list of field names from string literals, keeping order.
pub(crate) fn names<const N: usize>(raw: [&str; N]) -> Vec<FieldName> {
    raw.iter().map(|s| FieldName::from_str(s)).collect()
}
