//! Calibration session states and their key handling

use crate::keys::Key;

/// Where the interactive session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Menu shown, waiting for a command
    #[default]
    Menu,
    /// Live supply display, reference adjustable
    Tuning,
}

/// Direction of a reference adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Adjust {
    Up,
    Down,
}

/// What the session should do in response to one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Nothing to do this iteration
    Ignore,
    /// Return to the menu and reprint it
    ShowMenu,
    /// Switch to the live display
    EnterTuning,
    /// Restore the persisted reference
    Load,
    /// Persist the current reference
    Save,
    /// Nudge the reference by one step
    Adjust(Adjust),
    /// Redraw the live display if it is due
    Refresh,
    /// Leave the session
    Exit,
}

impl SessionState {
    /// Map a decoded key (or its absence) to an action
    ///
    /// Keys with no meaning in the current state are ignored.
    pub fn action_for(self, key: Option<Key>) -> Action {
        match (self, key) {
            (SessionState::Menu, Some(Key::Space)) => Action::EnterTuning,
            (SessionState::Menu, Some(Key::Load)) => Action::Load,
            (SessionState::Menu, Some(Key::Save)) => Action::Save,
            (SessionState::Menu, Some(Key::Escape | Key::Quit)) => Action::Exit,
            (SessionState::Menu, Some(Key::Up | Key::Down) | None) => Action::Ignore,

            (SessionState::Tuning, Some(Key::Space | Key::Escape | Key::Quit)) => Action::ShowMenu,
            (SessionState::Tuning, Some(Key::Up)) => Action::Adjust(Adjust::Up),
            (SessionState::Tuning, Some(Key::Down)) => Action::Adjust(Adjust::Down),
            (SessionState::Tuning, Some(Key::Load | Key::Save)) => Action::Ignore,
            (SessionState::Tuning, None) => Action::Refresh,
        }
    }
}

impl Adjust {
    /// Apply to `reference_mv`, saturating at the `u16` bounds
    pub fn apply(self, reference_mv: u16, step_mv: u16) -> u16 {
        match self {
            Adjust::Up => reference_mv.saturating_add(step_mv),
            Adjust::Down => reference_mv.saturating_sub(step_mv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_menu() {
        assert_eq!(SessionState::default(), SessionState::Menu);
    }

    #[test]
    fn test_menu_actions() {
        let s = SessionState::Menu;
        assert_eq!(s.action_for(Some(Key::Space)), Action::EnterTuning);
        assert_eq!(s.action_for(Some(Key::Load)), Action::Load);
        assert_eq!(s.action_for(Some(Key::Save)), Action::Save);
        assert_eq!(s.action_for(Some(Key::Escape)), Action::Exit);
        assert_eq!(s.action_for(Some(Key::Quit)), Action::Exit);
        assert_eq!(s.action_for(Some(Key::Up)), Action::Ignore);
        assert_eq!(s.action_for(None), Action::Ignore);
    }

    #[test]
    fn test_tuning_actions() {
        let s = SessionState::Tuning;
        assert_eq!(s.action_for(Some(Key::Space)), Action::ShowMenu);
        assert_eq!(s.action_for(Some(Key::Escape)), Action::ShowMenu);
        assert_eq!(s.action_for(Some(Key::Quit)), Action::ShowMenu);
        assert_eq!(s.action_for(Some(Key::Up)), Action::Adjust(Adjust::Up));
        assert_eq!(s.action_for(Some(Key::Down)), Action::Adjust(Adjust::Down));
        assert_eq!(s.action_for(Some(Key::Save)), Action::Ignore);
        assert_eq!(s.action_for(None), Action::Refresh);
    }

    #[test]
    fn test_adjust_saturates() {
        assert_eq!(Adjust::Up.apply(1100, 1), 1101);
        assert_eq!(Adjust::Down.apply(1100, 5), 1095);
        assert_eq!(Adjust::Up.apply(u16::MAX, 1), u16::MAX);
        assert_eq!(Adjust::Down.apply(0, 1), 0);
    }
}
