//! Error types for configuration and arena loading.
//!
//! Gameplay commands never fail; an invalid command is a silent no-op handled
//! by [`crate::state`]. Errors only arise while turning external input
//! (`assets/game.toml`, maze rows) into validated values at startup.

use std::fmt;
use std::time::Duration;

/// Top-level error enum for the maze shooter.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// `assets/game.toml` could not be parsed.
    ConfigParse {
        /// Parser message, including the offending line where available.
        message: String,
    },

    /// A configuration value is outside its usable range.
    InvalidValue {
        /// Name of the config key.
        name: &'static str,
        /// The rejected value, rendered for logging.
        value: String,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// Maze rows have inconsistent widths or contain an unknown character.
    MalformedMaze {
        /// Zero-based row where the problem was found.
        row: usize,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ConfigParse { message } => {
                write!(f, "failed to parse game config: {}", message)
            }
            GameError::InvalidValue {
                name,
                value,
                expected,
            } => write!(
                f,
                "config value '{}' = {} is invalid (expected {})",
                name, value, expected
            ),
            GameError::MalformedMaze { row, reason } => {
                write!(f, "malformed maze at row {}: {}", row, reason)
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

impl From<toml::de::Error> for GameError {
    fn from(err: toml::de::Error) -> Self {
        GameError::ConfigParse {
            message: err.to_string(),
        }
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn require_positive(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidValue {
            name,
            value: value.to_string(),
            expected: "a finite number > 0",
        })
    }
}

/// Returns an error unless `value` is finite and not negative.
pub fn require_non_negative(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidValue {
            name,
            value: value.to_string(),
            expected: "a finite number >= 0",
        })
    }
}

/// Returns the [`Duration`] for `secs` seconds, or an error when it is
/// negative, not finite, or too large to represent.
pub fn require_duration_secs(name: &'static str, secs: f32) -> GameResult<Duration> {
    Duration::try_from_secs_f32(secs).map_err(|_| GameError::InvalidValue {
        name,
        value: secs.to_string(),
        expected: "a non-negative number of seconds that fits a Duration",
    })
}

/// Returns an error if an integer setting is zero.
pub fn require_nonzero(name: &'static str, value: u32) -> GameResult<()> {
    if value == 0 {
        Err(GameError::InvalidValue {
            name,
            value: value.to_string(),
            expected: "an integer >= 1",
        })
    } else {
        Ok(())
    }
}
