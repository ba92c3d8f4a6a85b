//! Error types for battle resolution.

use thiserror::Error;

use crate::status::StatField;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for all battle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// Stat input was not a number at all.
    #[error("{0} must be a number")]
    NotANumber(StatField),

    /// Stat input had a fractional part.
    #[error("{0} must be an integer")]
    NonInteger(StatField),

    /// Stat input was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositive(StatField),

    /// Stat input does not fit the resource range.
    #[error("{0} is too large")]
    StatOverflow(StatField),

    /// Unit handed to the battlefield as player is not a player.
    #[error("Invalid player unit")]
    InvalidPlayer,

    /// Unit handed to the battlefield as enemy is not a monster.
    #[error("Invalid enemy unit")]
    InvalidEnemy,

    /// Skill id is already registered on the unit.
    #[error("Skill already known: {0}")]
    SkillAlreadyKnown(String),

    /// Skill id is not registered on the unit.
    #[error("Skill not learned: {0}")]
    SkillNotLearned(String),

    /// Caster cannot pay the skill's mana cost.
    #[error("Insufficient mana for '{skill}': need {required}, have {available}")]
    InsufficientMana {
        /// Skill that was attempted.
        skill: String,
        /// Mana cost of the skill.
        required: u32,
        /// Caster's current mana.
        available: u32,
    },

    /// A turn was submitted after the winner was decided.
    #[error("Game has already ended")]
    GameEnded,

    /// A turn was submitted while a side is missing.
    #[error("Both player and enemy must be attached before processing a turn")]
    UnitsNotAttached,

    /// Player name is outside the allowed length.
    #[error("Player name must be {min} to {max} characters, got {actual}")]
    NameLengthOutOfRange {
        /// Minimum characters.
        min: usize,
        /// Maximum characters.
        max: usize,
        /// Characters supplied.
        actual: usize,
    },

    /// Player HP and MP do not add up to the required total.
    #[error("HP + MP must total {expected}, got {actual}")]
    InvalidStatTotal {
        /// Required total.
        expected: i64,
        /// Supplied total.
        actual: i64,
    },

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParse {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Invalid battle state (serialization, replay divergence, bad data).
    #[error("Invalid battle state: {0}")]
    InvalidState(String),
}
