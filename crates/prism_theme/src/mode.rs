//! Theme mode and appearance resolution
//!
//! [`ThemeMode`] is the user's stored preference; [`OsAppearance`] is the
//! host platform's live light/dark signal. [`resolve_is_dark`] combines the
//! two into the effective appearance used for rendering. The resolver is a
//! pure function of its inputs and is re-run whenever either changes.

use serde::{Deserialize, Serialize};

/// The user's stored theme preference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Defer to the operating system's appearance
    #[default]
    System,
}

impl ThemeMode {
    /// Stable id for persistence
    pub fn id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Parse a persisted id; anything unrecognized is `None`
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// The host platform's light/dark preference
///
/// Read-only to this crate; may change at any time during the process
/// lifetime. `Unknown` covers platforms (or failures) where the preference
/// cannot be read and resolves to light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OsAppearance {
    Light,
    Dark,
    #[default]
    Unknown,
}

/// Resolve the effective appearance from mode and OS signal
///
/// Pure and total: explicit modes win outright, `System` follows the OS,
/// and an unknown OS signal counts as light.
pub fn resolve_is_dark(mode: ThemeMode, os: OsAppearance) -> bool {
    match mode {
        ThemeMode::Dark => true,
        ThemeMode::Light => false,
        ThemeMode::System => os == OsAppearance::Dark,
    }
}
