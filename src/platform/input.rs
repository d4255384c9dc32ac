//! Input mapping
//!
//! Two triggers exist: a discrete activate key and pointer down (mouse or
//! touch). Both become `Command::Activate`; the session decides what that
//! means in the current phase.

use crate::sim::{Command, Phase};

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Command(Command),
    /// Debug: toggle the demo autopilot
    ToggleAutopilot,
}

/// Map a `KeyboardEvent.code` to an action
pub fn map_key(code: &str) -> Option<InputAction> {
    match code {
        "Space" | "ArrowUp" => Some(InputAction::Command(Command::Activate)),
        "KeyI" => Some(InputAction::ToggleAutopilot),
        _ => None,
    }
}

/// Pointer down only activates on the play screen; elsewhere it must reach
/// the page's buttons untouched.
pub fn pointer_activates(phase: Phase) -> bool {
    matches!(phase, Phase::Ready | Phase::Playing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_keys() {
        assert_eq!(map_key("Space"), Some(InputAction::Command(Command::Activate)));
        assert_eq!(map_key("ArrowUp"), Some(InputAction::Command(Command::Activate)));
        assert_eq!(map_key("KeyI"), Some(InputAction::ToggleAutopilot));
        assert_eq!(map_key("Enter"), None);
        assert_eq!(map_key("ArrowDown"), None);
    }

    #[test]
    fn test_pointer_phases() {
        assert!(!pointer_activates(Phase::Setup));
        assert!(pointer_activates(Phase::Ready));
        assert!(pointer_activates(Phase::Playing));
        assert!(!pointer_activates(Phase::GameOver));
    }
}
