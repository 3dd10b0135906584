//! Global state machine and launch mode.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}

/// Which ruleset the session runs.
///
/// - `Beginner`: free-flight trainer, objective is coins.
/// - `Shooter`: combat, objective is kills.
#[derive(Resource, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameMode {
    Beginner,
    #[default]
    Shooter,
}

impl GameMode {
    /// Parse a launch argument (`beginner` / `shooter`, case-insensitive).
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg.to_ascii_lowercase().as_str() {
            "beginner" | "trainer" => Some(Self::Beginner),
            "shooter" | "combat" => Some(Self::Shooter),
            _ => None,
        }
    }

    #[inline]
    pub fn has_weapons(self) -> bool {
        matches!(self, Self::Shooter)
    }
}

#[cfg(test)]
mod tests {
    use super::GameMode;

    #[test]
    fn parses_launch_args() {
        assert_eq!(GameMode::from_arg("Beginner"), Some(GameMode::Beginner));
        assert_eq!(GameMode::from_arg("shooter"), Some(GameMode::Shooter));
        assert_eq!(GameMode::from_arg("--fullscreen"), None);
    }
}
