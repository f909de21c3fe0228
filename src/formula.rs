//! Decay cascade formulas.
//!
//! Excess aptitude was originally reflected in a pet's combat values
//! (attack, defence, speed, max HP, max MP, spirit power). When excess
//! decays, the matching share is unwound from those dependent fields.
//! Each tracked statistic index maps to one [`CascadeRule`].
//!
//! All reductions subtract and then floor at zero.

use crate::error::DecayError;
use crate::field::{names, FieldName};
use crate::record::PetStatRecord;
use crate::ATTRIBUTE_COUNT;
use serde::{Deserialize, Serialize};

/// Ordered list of names that may hold the same quantity.
///
/// The first name present in a record wins and is the only one written.
///
/// # Examples
///
/// ```rust
/// use petdecay::formula::FieldAliases;
/// use petdecay::PetStatRecord;
///
/// let aliases = FieldAliases::new(["max_blood", "blood_max"]);
/// let record = PetStatRecord::new(1).with_field("blood_max", 3000.0);
/// assert_eq!(aliases.resolve(&record).map(|f| f.as_str()), Some("blood_max"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldAliases(Vec<FieldName>);

impl FieldAliases {
    pub fn new<const N: usize>(raw: [&str; N]) -> Self {
        Self(names(raw))
    }

    /// First alias present in `record`.
    pub fn resolve(&self, record: &PetStatRecord) -> Option<&FieldName> {
        self.0.iter().find(|name| record.contains(name.as_str()))
    }
}

/// Names of the record fields the formulas read and reduce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeFields {
    pub grade: FieldName,
    /// Growth coefficient, unscaled (e.g. `1.25`).
    pub growth: FieldName,
    pub agility: FieldName,
    pub spirit_power: FieldName,
    pub attack: FieldName,
    pub defence: FieldName,
    pub speed: FieldName,
    pub stamina_max: FieldAliases,
    pub stamina_current: FieldName,
    pub magic_max: FieldAliases,
    pub magic_current: FieldName,
}

impl Default for CascadeFields {
    fn default() -> Self {
        Self {
            grade: "pet_grade".into(),
            growth: "cheng_zhang".into(),
            agility: "min_jie".into(),
            spirit_power: "ling_li".into(),
            attack: "attack".into(),
            defence: "defence".into(),
            speed: "speed".into(),
            stamina_max: FieldAliases::new(["max_blood", "blood_max"]),
            stamina_current: "blood".into(),
            magic_max: FieldAliases::new(["max_magic", "magic_max"]),
            magic_current: "magic".into(),
        }
    }
}

impl CascadeFields {
    /// Resolve every alias list against `record`.
    pub fn resolve(&self, record: &PetStatRecord) -> ResolvedTargets {
        ResolvedTargets {
            stamina_max: self.stamina_max.resolve(record).cloned(),
            magic_max: self.magic_max.resolve(record).cloned(),
        }
    }
}

/// Alias choices made once per engine call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTargets {
    pub stamina_max: Option<FieldName>,
    pub magic_max: Option<FieldName>,
}

/// Dependent-field formula for one tracked statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeRule {
    /// No dependent fields.
    None,
    Attack,
    Defence,
    /// Needs agility; skipped without it.
    Speed,
    /// Reduces max HP and clamps current HP.
    Stamina,
    /// Reduces max MP (clamping current MP) and spirit power.
    Magic,
}

/// One dependent-field reduction performed by a cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reduction {
    pub field: FieldName,
    /// Requested decrease before flooring.
    pub decay: f64,
    /// Field value after the reduction.
    pub value_after: f64,
}

/// Per-index cascade formulas plus the field names they use.
///
/// # Examples
///
/// ```rust
/// use petdecay::formula::DecayFormulaTable;
/// use petdecay::PetStatRecord;
///
/// let table = DecayFormulaTable::default();
/// let mut record = PetStatRecord::new(102001)
///     .with_field("pet_grade", 100.0)
///     .with_field("min_jie", 200.0)
///     .with_field("speed", 300.0);
///
/// // speed decay = ceil(125 * 200 / 1000) = 25
/// let reductions = table.apply_cascade(&mut record, 2, 125.0);
/// assert_eq!(reductions[0].decay, 25.0);
/// assert_eq!(record.get("speed"), Some(275.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayFormulaTable {
    pub rules: Vec<CascadeRule>,
    pub fields: CascadeFields,
}

impl Default for DecayFormulaTable {
    fn default() -> Self {
        Self {
            rules: vec![
                CascadeRule::Attack,
                CascadeRule::Defence,
                CascadeRule::Speed,
                CascadeRule::None,
                CascadeRule::Stamina,
                CascadeRule::Magic,
            ],
            fields: CascadeFields::default(),
        }
    }
}

impl DecayFormulaTable {
    pub fn validate(&self) -> Result<(), DecayError> {
        if self.rules.len() != ATTRIBUTE_COUNT {
            return Err(DecayError::AttributeCount {
                what: "cascade rules",
                found: self.rules.len(),
            });
        }
        Ok(())
    }

    /// Unwind `amount` of decayed excess at `index` from the dependent fields.
    ///
    /// Resolves field aliases against `record` first; see
    /// [`apply_resolved`](Self::apply_resolved) to reuse a resolution.
    pub fn apply_cascade(
        &self,
        record: &mut PetStatRecord,
        index: usize,
        amount: f64,
    ) -> Vec<Reduction> {
        let targets = self.fields.resolve(record);
        self.apply_resolved(record, index, amount, &targets)
    }

    /// Like [`apply_cascade`](Self::apply_cascade) with pre-resolved aliases.
    pub fn apply_resolved(
        &self,
        record: &mut PetStatRecord,
        index: usize,
        amount: f64,
        targets: &ResolvedTargets,
    ) -> Vec<Reduction> {
        let mut out = Vec::new();
        if amount <= 0.0 {
            return out;
        }
        let Some(rule) = self.rules.get(index) else {
            return out;
        };

        let f = &self.fields;
        let grade = record.get(f.grade.as_str());
        // growth is stored unscaled; the formulas work in thousandths
        let growth = record
            .get(f.growth.as_str())
            .map(|g| (g * 1000.0).round());

        match rule {
            CascadeRule::None => {}
            CascadeRule::Attack => {
                if let (Some(grade), Some(growth)) = (grade, growth) {
                    let decay = (amount * grade * 2.0 / 1000.0 * (700.0 + growth / 2.0) / 1000.0
                        * 4.0
                        / 3.0)
                        .ceil();
                    reduce(record, &f.attack, decay, &mut out);
                }
            }
            CascadeRule::Defence => {
                if let (Some(grade), Some(growth)) = (grade, growth) {
                    let decay =
                        (amount * grade * 7.0 / 4000.0 * (700.0 + growth / 2.0) / 1000.0).ceil();
                    reduce(record, &f.defence, decay, &mut out);
                }
            }
            CascadeRule::Speed => {
                if let Some(agility) = record.get(f.agility.as_str()) {
                    let decay = (amount * agility / 1000.0).ceil();
                    reduce(record, &f.speed, decay, &mut out);
                }
            }
            CascadeRule::Stamina => {
                if let Some(grade) = grade {
                    let decay = (amount * grade / 1000.0).ceil();
                    if let Some(max) = &targets.stamina_max {
                        reduce_capacity(record, max, &f.stamina_current, decay, &mut out);
                    }
                }
            }
            CascadeRule::Magic => {
                if let Some(grade) = grade {
                    let decay = (amount * grade / 500.0).ceil();
                    if let Some(max) = &targets.magic_max {
                        reduce_capacity(record, max, &f.magic_current, decay, &mut out);
                    }
                    let spirit_decay = (amount * 3.0 / 10.0 * grade / 1000.0).ceil();
                    reduce(record, &f.spirit_power, spirit_decay, &mut out);
                }
            }
        }
        out
    }
}

fn reduce(record: &mut PetStatRecord, field: &FieldName, decay: f64, out: &mut Vec<Reduction>) {
    if let Some(value_after) = record.reduce_floored(field.as_str(), decay) {
        out.push(Reduction {
            field: field.clone(),
            decay,
            value_after,
        });
    }
}

/// Reduce a max field, then clamp its current counterpart to the new max.
fn reduce_capacity(
    record: &mut PetStatRecord,
    max: &FieldName,
    current: &FieldName,
    decay: f64,
    out: &mut Vec<Reduction>,
) {
    reduce(record, max, decay, out);
    let (Some(max_value), Some(current_value)) =
        (record.get(max.as_str()), record.get(current.as_str()))
    else {
        return;
    };
    if current_value > max_value {
        record.set(current.clone(), max_value);
        out.push(Reduction {
            field: current.clone(),
            decay: current_value - max_value,
            value_after: max_value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet() -> PetStatRecord {
        PetStatRecord::new(102001)
            .with_field("pet_grade", 100.0)
            .with_field("cheng_zhang", 1.2)
            .with_field("attack", 1000.0)
            .with_field("defence", 800.0)
            .with_field("speed", 400.0)
            .with_field("min_jie", 300.0)
            .with_field("max_blood", 4000.0)
            .with_field("blood", 4000.0)
            .with_field("max_magic", 2000.0)
            .with_field("magic", 1500.0)
            .with_field("ling_li", 500.0)
    }

    #[test]
    fn test_attack_formula() {
        let table = DecayFormulaTable::default();
        let mut record = pet();
        // 125 * 100 * 2/1000 * (700 + 600)/1000 * 4/3 = 43.33.. -> 44
        let out = table.apply_cascade(&mut record, 0, 125.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].decay, 44.0);
        assert_eq!(record.get("attack"), Some(956.0));
    }

    #[test]
    fn test_defence_formula() {
        let table = DecayFormulaTable::default();
        let mut record = pet();
        // 100 * 100 * 7/4000 * 1300/1000 = 22.75 -> 23
        table.apply_cascade(&mut record, 1, 100.0);
        assert_eq!(record.get("defence"), Some(777.0));
    }

    #[test]
    fn test_speed_requires_agility() {
        let table = DecayFormulaTable::default();
        let mut record = PetStatRecord::new(1).with_field("speed", 400.0);
        assert!(table.apply_cascade(&mut record, 2, 100.0).is_empty());
        assert_eq!(record.get("speed"), Some(400.0));
    }

    #[test]
    fn test_dodge_has_no_cascade() {
        let table = DecayFormulaTable::default();
        let mut record = pet();
        let before = record.clone();
        assert!(table.apply_cascade(&mut record, 3, 500.0).is_empty());
        assert_eq!(record, before);
    }

    #[test]
    fn test_stamina_clamps_current() {
        let table = DecayFormulaTable::default();
        let mut record = pet();
        // 250 * 100 / 1000 = 25
        let out = table.apply_cascade(&mut record, 4, 250.0);
        assert_eq!(record.get("max_blood"), Some(3975.0));
        assert_eq!(record.get("blood"), Some(3975.0));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].field.as_str(), "blood");
    }

    #[test]
    fn test_stamina_uses_first_present_alias_only() {
        let table = DecayFormulaTable::default();
        let mut record = PetStatRecord::new(1)
            .with_field("pet_grade", 100.0)
            .with_field("blood_max", 1000.0)
            .with_field("blood", 500.0);
        table.apply_cascade(&mut record, 4, 100.0);
        assert_eq!(record.get("blood_max"), Some(990.0));
        assert!(!record.contains("max_blood"));
        assert_eq!(record.get("blood"), Some(500.0));
    }

    #[test]
    fn test_magic_two_sub_decays() {
        let table = DecayFormulaTable::default();
        let mut record = pet();
        // max: 100 * 100 / 500 = 20; spirit: 100 * 0.3 * 100 / 1000 = 3
        table.apply_cascade(&mut record, 5, 100.0);
        assert_eq!(record.get("max_magic"), Some(1980.0));
        assert_eq!(record.get("magic"), Some(1500.0));
        assert_eq!(record.get("ling_li"), Some(497.0));
    }

    #[test]
    fn test_reductions_floor_at_zero() {
        let table = DecayFormulaTable::default();
        let mut record = pet().with_field("attack", 5.0);
        table.apply_cascade(&mut record, 0, 1000.0);
        assert_eq!(record.get("attack"), Some(0.0));
    }

    #[test]
    fn test_missing_grade_skips_cascade() {
        let table = DecayFormulaTable::default();
        let mut record = PetStatRecord::new(1)
            .with_field("cheng_zhang", 1.2)
            .with_field("attack", 1000.0);
        assert!(table.apply_cascade(&mut record, 0, 100.0).is_empty());
        assert_eq!(record.get("attack"), Some(1000.0));
    }

    #[test]
    fn test_rule_count_validated() {
        let table = DecayFormulaTable {
            rules: vec![CascadeRule::None],
            ..DecayFormulaTable::default()
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_rules_deserialize_snake_case() {
        let rules: Vec<CascadeRule> =
            serde_json::from_str(r#"["attack", "none", "magic"]"#).unwrap();
        assert_eq!(
            rules,
            vec![CascadeRule::Attack, CascadeRule::None, CascadeRule::Magic]
        );
    }
}
