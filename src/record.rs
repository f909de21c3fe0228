//! Pet statistics record module.
//!
//! A `PetStatRecord` is the decoded form of one pet descriptor: a
//! creature type id, an optional display name and a bag of numeric
//! fields. The engine reads and writes fields by name only.

use crate::field::FieldName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON key holding the creature type id in a decoded descriptor.
pub const TYPE_ID_KEY: &str = "type_id";

/// JSON key holding the display name in a decoded descriptor.
pub const NAME_KEY: &str = "name";

/// Creature type identifier as delivered by a decoder.
///
/// Decoders emit either a number or a string; both are accepted and
/// normalized on lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatureTypeId {
    Int(i64),
    Text(String),
}

impl CreatureTypeId {
    /// Integer value of this id. Strings that do not parse become 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use petdecay::CreatureTypeId;
    ///
    /// assert_eq!(CreatureTypeId::Int(102005).as_int(), 102005);
    /// assert_eq!(CreatureTypeId::Text(" 2005 ".into()).as_int(), 2005);
    /// assert_eq!(CreatureTypeId::Text("dragon".into()).as_int(), 0);
    /// ```
    pub fn as_int(&self) -> i64 {
        match self {
            CreatureTypeId::Int(id) => *id,
            CreatureTypeId::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

impl From<i64> for CreatureTypeId {
    fn from(id: i64) -> Self {
        CreatureTypeId::Int(id)
    }
}

impl From<i32> for CreatureTypeId {
    fn from(id: i32) -> Self {
        CreatureTypeId::Int(i64::from(id))
    }
}

impl From<&str> for CreatureTypeId {
    fn from(id: &str) -> Self {
        CreatureTypeId::Text(id.to_string())
    }
}

impl std::fmt::Display for CreatureTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatureTypeId::Int(id) => write!(f, "{id}"),
            CreatureTypeId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Mutable statistics of one pet.
///
/// # Examples
///
/// ```rust
/// use petdecay::PetStatRecord;
///
/// let mut record = PetStatRecord::new(102001)
///     .with_name("Azure Dragon")
///     .with_field("gong_ji_zz", 1600.0);
///
/// assert_eq!(record.get("gong_ji_zz"), Some(1600.0));
/// record.set("gong_ji_zz", 1550.0);
/// assert_eq!(record.get("gong_ji_zz"), Some(1550.0));
/// assert_eq!(record.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetStatRecord {
    /// Creature type id used for tier and exemption lookup.
    pub type_id: CreatureTypeId,

    /// Display name, consulted for name-prefix cap overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    fields: BTreeMap<FieldName, f64>,
}

impl PetStatRecord {
    /// Create an empty record for the given creature type.
    pub fn new(type_id: impl Into<CreatureTypeId>) -> Self {
        Self {
            type_id: type_id.into(),
            name: None,
            fields: BTreeMap::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a numeric field.
    pub fn with_field(mut self, name: impl Into<FieldName>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// Build a record from a decoder's JSON object.
    ///
    /// `type_id` and `name` are taken from [`TYPE_ID_KEY`] and
    /// [`NAME_KEY`]. Every other entry holding a number or a numeric
    /// string becomes a field; anything else is dropped, so a non-numeric
    /// grade simply reads as absent. A non-object value yields an empty
    /// record with type id 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use petdecay::PetStatRecord;
    /// use serde_json::json;
    ///
    /// let record = PetStatRecord::from_json(&json!({
    ///     "type_id": "102001",
    ///     "name": "Azure Dragon",
    ///     "pet_grade": "105",
    ///     "cheng_zhang": 1.25,
    ///     "skills": [301, 302],
    /// }));
    ///
    /// assert_eq!(record.type_id.as_int(), 102001);
    /// assert_eq!(record.get("pet_grade"), Some(105.0));
    /// assert_eq!(record.get("skills"), None);
    /// ```
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut record = Self::new(0);
        let Some(object) = value.as_object() else {
            return record;
        };

        for (key, entry) in object {
            match key.as_str() {
                TYPE_ID_KEY => {
                    record.type_id = match entry {
                        serde_json::Value::Number(n) => {
                            CreatureTypeId::Int(n.as_i64().unwrap_or(0))
                        }
                        serde_json::Value::String(s) => CreatureTypeId::Text(s.clone()),
                        _ => CreatureTypeId::Int(0),
                    };
                }
                NAME_KEY => record.name = entry.as_str().map(str::to_string),
                _ => {
                    if let Some(number) = numeric(entry) {
                        record.set(key.as_str(), number);
                    }
                }
            }
        }
        record
    }

    /// Read a numeric field.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// Check whether a field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Write a numeric field, inserting it if absent.
    pub fn set(&mut self, name: impl Into<FieldName>, value: f64) {
        self.fields.insert(name.into(), value);
    }

    /// Subtract `amount` from a field, flooring the result at zero.
    ///
    /// Returns the new value, or `None` if the field is absent.
    pub fn reduce_floored(&mut self, name: &str, amount: f64) -> Option<f64> {
        let slot = self.fields.get_mut(name)?;
        *slot = (*slot - amount).max(0.0);
        Some(*slot)
    }

    /// Iterate over all numeric fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldName, f64)> {
        self.fields.iter().map(|(k, v)| (k, *v))
    }
}

fn numeric(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reduce_floored_never_negative() {
        let mut record = PetStatRecord::new(1).with_field("attack", 10.0);
        assert_eq!(record.reduce_floored("attack", 4.0), Some(6.0));
        assert_eq!(record.reduce_floored("attack", 40.0), Some(0.0));
        assert_eq!(record.reduce_floored("missing", 1.0), None);
    }

    #[test]
    fn test_from_json_drops_non_numeric() {
        let record = PetStatRecord::from_json(&json!({
            "type_id": 102001,
            "pet_grade": "high",
            "attack": "  812 ",
            "flags": true,
        }));
        assert_eq!(record.type_id, CreatureTypeId::Int(102001));
        assert!(!record.contains("pet_grade"));
        assert_eq!(record.get("attack"), Some(812.0));
        assert!(!record.contains("flags"));
        assert_eq!(record.name, None);
    }

    #[test]
    fn test_from_json_non_object() {
        let record = PetStatRecord::from_json(&json!([1, 2, 3]));
        assert_eq!(record.type_id.as_int(), 0);
        assert_eq!(record.fields().count(), 0);
    }

    #[test]
    fn test_record_serde_roundtrip_keeps_text_id() {
        let record = PetStatRecord::new("102001").with_field("speed", 300.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type_id"], json!("102001"));
        let back: PetStatRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
