//! Arena configuration parameters.

use std::error::Error;
use std::fmt;

/// Configuration for the slot arena.
///
/// Controls the id space, initial table sizing, path rendering depth and
/// the global on/off switch. Validated at arena construction; immutable
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Exclusive upper bound of the id space.
    ///
    /// Ids `1..max_id` are allocatable; `max_id` itself is the reserved
    /// "invalid" sentinel. Default: `u32::MAX`. Must be at least 1.
    pub max_id: u32,

    /// Number of slots reserved up front in the slot table.
    ///
    /// Default: 64. The table still grows on demand past this.
    pub initial_slots: usize,

    /// Maximum number of labels rendered by a scope path.
    ///
    /// Default: 32. Must be at least 1.
    pub max_path_depth: usize,

    /// Whether the arena hands out slots at all.
    ///
    /// When `false` every allocation degrades to the fallback slot, so
    /// every accessor returns fallback values. Defaults to `false` only
    /// when the `disabled` feature is on.
    pub enabled: bool,
}

impl ArenaConfig {
    /// Default exclusive id bound.
    pub const DEFAULT_MAX_ID: u32 = u32::MAX;

    /// Default slot table reservation.
    pub const DEFAULT_INITIAL_SLOTS: usize = 64;

    /// Default path rendering depth.
    pub const DEFAULT_MAX_PATH_DEPTH: usize = 32;

    /// Create a config with the given id bound and defaults elsewhere.
    pub fn with_max_id(max_id: u32) -> Self {
        Self {
            max_id,
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_id == 0 {
            return Err(ConfigError::ZeroIdSpace);
        }
        if self.max_path_depth == 0 {
            return Err(ConfigError::ZeroPathDepth);
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            max_id: Self::DEFAULT_MAX_ID,
            initial_slots: Self::DEFAULT_INITIAL_SLOTS,
            max_path_depth: Self::DEFAULT_MAX_PATH_DEPTH,
            enabled: !cfg!(feature = "disabled"),
        }
    }
}

/// Errors detected by [`ArenaConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_id` is 0, leaving no room for the fallback id.
    ZeroIdSpace,
    /// `max_path_depth` is 0.
    ZeroPathDepth,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroIdSpace => write!(f, "max_id must be at least 1"),
            Self::ZeroPathDepth => write!(f, "max_path_depth must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
