//! # petdecay - Deterministic Pet Aptitude Decay
//!
//! Reconstructs how a pet's above-cap aptitudes have eroded since a saved
//! snapshot. The engine is:
//! - **Deterministic**: same record, context and tables give the same result
//! - **Table-driven**: tiers, caps, exemptions and formulas are injectable data
//! - **Field-name agnostic**: record layouts are described by configuration
//! - **Safe to call unconditionally**: unusable inputs are soft skips
//!
//! ## Pipeline
//!
//! ```text
//! [PetStatRecord] + [ResolutionContext]
//!        → exemption check → baseline → tier → caps
//!        → per-statistic split and yearly decay → cascade into combat fields
//!        → [DecayReport]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use petdecay::*;
//! use chrono::NaiveDate;
//!
//! let engine = ExcessStatEngine::default();
//! let pet = PetStatRecord::new(102001)
//!     .with_field("gong_ji_zz", 1800.0)
//!     .with_field("pet_grade", 100.0)
//!     .with_field("cheng_zhang", 1.2)
//!     .with_field("attack", 1000.0);
//!
//! let ctx = ResolutionContext::new()
//!     .with_baseline("1500|1400|1400|1500|5000|2900")
//!     .with_last_checked_year(2023)
//!     .on_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
//!
//! let outcome = engine.apply(&pet, &ctx);
//! assert_eq!(outcome.record.get("gong_ji_zz"), Some(1550.0));
//! assert_eq!(outcome.record.get("attack_ext"), Some(125.0));
//! assert_eq!(outcome.record.get("attack"), Some(956.0));
//! ```
//!
//! ## Modules
//!
//! - [`field`] - Field name type
//! - [`record`] - Pet statistics record
//! - [`context`] - Per-call resolution context
//! - [`tier`] - Battle tier table
//! - [`shenshou`] - Exempt creature classifier
//! - [`caps`] - Aptitude cap table
//! - [`formula`] - Dependent-field cascade formulas
//! - [`tables`] - Bundled static configuration
//! - [`engine`] - Excess decay engine
//! - [`report`] - Per-call breakdown
//! - [`error`] - Error types

pub mod caps;
pub mod context;
pub mod engine;
pub mod error;
pub mod field;
pub mod formula;
pub mod record;
pub mod report;
pub mod shenshou;
pub mod tables;
pub mod tier;

/// Number of tracked aptitudes: attack, defence, speed, dodge, stamina, magic.
pub const ATTRIBUTE_COUNT: usize = 6;

// Re-export main types for convenience
pub use context::{BaselineSnapshot, ResolutionContext};
pub use engine::{apply_excess_decay, DecayOutcome, ExcessStatEngine};
pub use error::DecayError;
pub use field::FieldName;
pub use record::{CreatureTypeId, PetStatRecord};
pub use report::{DecayReport, SkipReason, StatDecay};
pub use shenshou::ShenshouClassifier;
pub use tables::DecayTables;
pub use tier::{BattleTierTable, Tier};

pub use caps::{CapTable, PrefixOverride};
pub use formula::{CascadeFields, CascadeRule, DecayFormulaTable, FieldAliases};
