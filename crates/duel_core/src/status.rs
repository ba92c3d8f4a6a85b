//! Unit resource model: health and mana pools, stat validation, snapshots.
//!
//! Pools clamp on every mutation, so `0 <= current <= max` holds for the
//! lifetime of a unit. The only way to read a unit's resources from outside
//! the crate is a [`UnitStatus`] snapshot, which is a detached copy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};

/// Which resource a stat input configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatField {
    /// Health points.
    Hp,
    /// Mana points.
    Mp,
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatField::Hp => f.write_str("HP"),
            StatField::Mp => f.write_str("MP"),
        }
    }
}

/// Unvalidated stat value as it arrives from a caller or a data file.
///
/// Deserializes untagged, so a RON scenario may contain `120`, `120.5`,
/// `"lots"` or `true` and each is rejected with the matching error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatInput {
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Boolean.
    Flag(bool),
}

impl From<i64> for StatInput {
    fn from(value: i64) -> Self {
        StatInput::Integer(value)
    }
}

impl From<i32> for StatInput {
    fn from(value: i32) -> Self {
        StatInput::Integer(i64::from(value))
    }
}

impl From<u32> for StatInput {
    fn from(value: u32) -> Self {
        StatInput::Integer(i64::from(value))
    }
}

impl From<f64> for StatInput {
    fn from(value: f64) -> Self {
        StatInput::Float(value)
    }
}

impl From<&str> for StatInput {
    fn from(value: &str) -> Self {
        StatInput::Text(value.to_string())
    }
}

impl From<bool> for StatInput {
    fn from(value: bool) -> Self {
        StatInput::Flag(value)
    }
}

/// Validate a raw stat input into a pool maximum.
///
/// Checks run in order: not-a-number, non-integer, non-positive, overflow.
///
/// # Errors
///
/// Returns the first rule the input breaks, tagged with `field`.
pub fn validate_stat(field: StatField, input: &StatInput) -> Result<u32> {
    match input {
        StatInput::Text(_) | StatInput::Flag(_) => Err(BattleError::NotANumber(field)),
        StatInput::Float(f) if !f.is_finite() => Err(BattleError::NotANumber(field)),
        StatInput::Float(f) if f.fract() != 0.0 => Err(BattleError::NonInteger(field)),
        StatInput::Float(f) if *f <= 0.0 => Err(BattleError::NonPositive(field)),
        StatInput::Float(f) if *f > f64::from(u32::MAX) => Err(BattleError::StatOverflow(field)),
        StatInput::Float(f) => Ok(*f as u32),
        StatInput::Integer(n) if *n <= 0 => Err(BattleError::NonPositive(field)),
        StatInput::Integer(n) => u32::try_from(*n).map_err(|_| BattleError::StatOverflow(field)),
    }
}

/// A bounded resource pool (health or mana).
///
/// Only built through [`Pool::full`], so `current <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pool {
    current: u32,
    max: u32,
}

impl Pool {
    /// Create a pool at full capacity.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Current value.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Maximum value.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Whether the pool is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Remove up to `amount`, returning how much was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    /// Add up to `amount` without passing `max`, returning how much was added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let headroom = self.max.saturating_sub(self.current);
        let actual = amount.min(headroom);
        self.current += actual;
        actual
    }
}

/// Owned resource record of a unit.
///
/// Mutation is crate-private; skills go through these methods so the clamping
/// rules live in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vitals {
    name: String,
    hp: Pool,
    mp: Option<Pool>,
}

impl Vitals {
    /// Build a record at full health and mana.
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: u32, max_mp: Option<u32>) -> Self {
        Self {
            name: name.into(),
            hp: Pool::full(max_hp),
            mp: max_mp.map(Pool::full),
        }
    }

    /// Unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current health.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp.current()
    }

    /// Current mana; zero for units without a mana pool.
    #[must_use]
    pub fn mp(&self) -> u32 {
        self.mp.map_or(0, |pool| pool.current())
    }

    /// Whether the unit has a mana pool at all.
    #[must_use]
    pub const fn has_mana_pool(&self) -> bool {
        self.mp.is_some()
    }

    /// Health has reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.hp.is_empty()
    }

    pub(crate) fn increase_hp(&mut self, amount: u32) -> u32 {
        self.hp.restore(amount)
    }

    pub(crate) fn decrease_hp(&mut self, amount: u32) -> u32 {
        self.hp.drain(amount)
    }

    pub(crate) fn increase_mp(&mut self, amount: u32) -> u32 {
        self.mp.as_mut().map_or(0, |pool| pool.restore(amount))
    }

    pub(crate) fn decrease_mp(&mut self, amount: u32) -> u32 {
        self.mp.as_mut().map_or(0, |pool| pool.drain(amount))
    }

    /// Point-in-time copy for callers outside the unit.
    #[must_use]
    pub fn snapshot(&self) -> UnitStatus {
        UnitStatus {
            name: self.name.clone(),
            hp: self.hp.current(),
            max_hp: self.hp.max(),
            mp: self.mp.map(|pool| pool.current()),
            max_mp: self.mp.map(|pool| pool.max()),
            is_dead: self.is_dead(),
        }
    }
}

/// Detached copy of a unit's resources.
///
/// Changing a snapshot never affects the unit it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStatus {
    /// Unit name.
    pub name: String,
    /// Current health.
    pub hp: u32,
    /// Maximum health.
    pub max_hp: u32,
    /// Current mana, if the unit has a mana pool.
    pub mp: Option<u32>,
    /// Maximum mana, if the unit has a mana pool.
    pub max_mp: Option<u32>,
    /// Derived from `hp == 0`.
    pub is_dead: bool,
}
