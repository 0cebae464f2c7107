//! Status enums for long-running operations.

use serde::{Deserialize, Serialize};

/// Lifecycle of a catalog load.
///
/// `Loaded` and `Failed` are terminal for a single attempt; a new refresh
/// moves any state back to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Loaded,
    /// The last request failed.
    Failed,
}

impl LoadStatus {
    /// Whether a request is currently in flight.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether the last attempt has settled (either way).
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }

    /// Lowercase label for logs and status lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

impl core::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(LoadStatus::default(), LoadStatus::Idle);
        assert!(!LoadStatus::Idle.is_settled());
    }

    #[test]
    fn test_terminal_states_are_settled() {
        assert!(LoadStatus::Loaded.is_settled());
        assert!(LoadStatus::Failed.is_settled());
        assert!(!LoadStatus::Loading.is_settled());
        assert!(LoadStatus::Loading.is_loading());
    }

    #[test]
    fn test_display() {
        assert_eq!(LoadStatus::Failed.to_string(), "failed");
    }
}
