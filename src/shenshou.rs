//! Shenshou classifier module.
//!
//! Shenshou (divine beast) types are a protected category: their
//! aptitudes never decay, whatever the baseline or tier.

use crate::record::CreatureTypeId;
use crate::tier::TYPE_ID_OFFSET;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normalize a creature type id to its live form.
///
/// Strings are parsed (0 on failure); ids below [`TYPE_ID_OFFSET`] get
/// the offset added.
///
/// # Examples
///
/// ```rust
/// use petdecay::shenshou::normalize_type_id;
/// use petdecay::CreatureTypeId;
///
/// assert_eq!(normalize_type_id(&CreatureTypeId::Int(2005)), 102005);
/// assert_eq!(normalize_type_id(&CreatureTypeId::Int(102005)), 102005);
/// assert_eq!(normalize_type_id(&"x".into()), 100000);
/// ```
pub fn normalize_type_id(type_id: &CreatureTypeId) -> i64 {
    let id = type_id.as_int();
    if id < TYPE_ID_OFFSET {
        id + TYPE_ID_OFFSET
    } else {
        id
    }
}

/// Membership test for exempt creature types.
///
/// Ids in the set are stored already offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShenshouClassifier {
    type_ids: BTreeSet<i64>,
}

impl ShenshouClassifier {
    pub fn new(type_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            type_ids: type_ids.into_iter().collect(),
        }
    }

    /// Decide whether a creature type is exempt from decay.
    ///
    /// An explicit `exemption_override` is returned verbatim; the set is
    /// only consulted when it is `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use petdecay::ShenshouClassifier;
    ///
    /// let classifier = ShenshouClassifier::new([102005]);
    /// assert!(classifier.is_exempt(&2005.into(), None));
    /// assert!(classifier.is_exempt(&"102005".into(), None));
    /// assert!(!classifier.is_exempt(&102005.into(), Some(false)));
    /// assert!(classifier.is_exempt(&102001.into(), Some(true)));
    /// ```
    pub fn is_exempt(&self, type_id: &CreatureTypeId, exemption_override: Option<bool>) -> bool {
        if let Some(exempt) = exemption_override {
            return exempt;
        }
        self.type_ids.contains(&normalize_type_id(type_id))
    }

    pub fn len(&self) -> usize {
        self.type_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.type_ids.is_empty()
    }
}
