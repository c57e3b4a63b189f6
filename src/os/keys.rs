//! Key tracking for the show-desktop combination
//!
//! The tracker sees every key transition the low-level hook receives and
//! decides, per event, whether to pass it on, swallow it, or swallow it and
//! fire the combination. Only the secondary key's own press and release are
//! ever swallowed; the modifier always reaches the rest of the system so every
//! other Win+<key> shortcut keeps working.

/// Virtual-key codes
pub const VK_LWIN: u32 = 0x5B;
pub const VK_RWIN: u32 = 0x5C;
pub const VK_D: u32 = 0x44;

/// Keyboard hook message identifiers
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;

/// Direction of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Down,
    Up,
}

impl KeyTransition {
    /// Map a hook message to a transition. System variants count the same.
    pub fn from_message(message: u32) -> Option<Self> {
        match message {
            WM_KEYDOWN | WM_SYSKEYDOWN => Some(KeyTransition::Down),
            WM_KEYUP | WM_SYSKEYUP => Some(KeyTransition::Up),
            _ => None,
        }
    }
}

/// One physical key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub vk: u32,
    pub transition: KeyTransition,
}

impl KeyEvent {
    pub const fn down(vk: u32) -> Self {
        Self {
            vk,
            transition: KeyTransition::Down,
        }
    }

    pub const fn up(vk: u32) -> Self {
        Self {
            vk,
            transition: KeyTransition::Up,
        }
    }
}

/// A modifier (any of its physical instances) plus a secondary key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    pub modifiers: [u32; 2],
    pub secondary: u32,
}

impl KeyCombo {
    /// Win+D
    pub const SHOW_DESKTOP: KeyCombo = KeyCombo {
        modifiers: [VK_LWIN, VK_RWIN],
        secondary: VK_D,
    };

    pub fn is_modifier(&self, vk: u32) -> bool {
        self.modifiers.contains(&vk)
    }
}

impl Default for KeyCombo {
    fn default() -> Self {
        Self::SHOW_DESKTOP
    }
}

/// What the hook should do with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Hand the event to the next hook unchanged
    Pass,
    /// Swallow the event
    Suppress,
    /// Swallow the event and fire the combination
    Fire,
}

impl KeyAction {
    pub fn suppresses(self) -> bool {
        !matches!(self, KeyAction::Pass)
    }
}

/// Tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Modifier is up, nothing pending
    #[default]
    Released,
    /// Modifier is down, waiting for the secondary key
    ModifierHeld,
    /// The combination fired; the secondary key's release is still owed
    SwallowingSecondary { modifier_held: bool },
}

impl KeyState {
    fn modifier_held(self) -> bool {
        match self {
            KeyState::Released => false,
            KeyState::ModifierHeld => true,
            KeyState::SwallowingSecondary { modifier_held } => modifier_held,
        }
    }

    fn with_modifier(self, held: bool) -> Self {
        match self {
            KeyState::SwallowingSecondary { .. } => KeyState::SwallowingSecondary { modifier_held: held },
            _ if held => KeyState::ModifierHeld,
            _ => KeyState::Released,
        }
    }
}

/// Key Tracker
///
/// Owned by the hook thread and mutated only from the hook callback.
#[derive(Debug, Clone, Default)]
pub struct KeyTracker {
    combo: KeyCombo,
    state: KeyState,
}

impl KeyTracker {
    pub fn new(combo: KeyCombo) -> Self {
        Self {
            combo,
            state: KeyState::Released,
        }
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    pub fn combo(&self) -> KeyCombo {
        self.combo
    }

    /// Feed one key transition and get the verdict for it
    pub fn observe(&mut self, event: KeyEvent) -> KeyAction {
        let down = event.transition == KeyTransition::Down;

        if self.combo.is_modifier(event.vk) {
            self.state = self.state.with_modifier(down);
            return KeyAction::Pass;
        }

        if event.vk != self.combo.secondary {
            return KeyAction::Pass;
        }

        if down {
            if !self.state.modifier_held() {
                return KeyAction::Pass;
            }
            // Every press under the modifier fires, auto-repeat included
            self.state = KeyState::SwallowingSecondary { modifier_held: true };
            return KeyAction::Fire;
        }

        match self.state {
            KeyState::SwallowingSecondary { modifier_held } => {
                self.state = KeyState::Released.with_modifier(modifier_held);
                KeyAction::Suppress
            }
            _ => KeyAction::Pass,
        }
    }

    /// Whether the modifier is currently believed to be down
    pub fn modifier_down(&self) -> bool {
        self.state.modifier_held()
    }

    /// Whether the secondary key's release is still going to be swallowed
    pub fn suppressing_secondary_release(&self) -> bool {
        matches!(self.state, KeyState::SwallowingSecondary { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VK_R: u32 = 0x52;
    const VK_SHIFT: u32 = 0x10;

    fn tracker() -> KeyTracker {
        KeyTracker::new(KeyCombo::SHOW_DESKTOP)
    }

    #[test]
    fn test_transition_from_message() {
        assert_eq!(KeyTransition::from_message(WM_KEYDOWN), Some(KeyTransition::Down));
        assert_eq!(KeyTransition::from_message(WM_SYSKEYDOWN), Some(KeyTransition::Down));
        assert_eq!(KeyTransition::from_message(WM_KEYUP), Some(KeyTransition::Up));
        assert_eq!(KeyTransition::from_message(WM_SYSKEYUP), Some(KeyTransition::Up));
        assert_eq!(KeyTransition::from_message(0x0200), None);
    }

    #[test]
    fn test_modifier_is_tracked_and_passed() {
        let mut t = tracker();
        assert_eq!(t.observe(KeyEvent::down(VK_LWIN)), KeyAction::Pass);
        assert!(t.modifier_down());
        assert_eq!(t.observe(KeyEvent::up(VK_LWIN)), KeyAction::Pass);
        assert!(!t.modifier_down());

        assert_eq!(t.observe(KeyEvent::down(VK_RWIN)), KeyAction::Pass);
        assert_eq!(t.state(), KeyState::ModifierHeld);
    }

    #[test]
    fn test_combination_swallows_press_and_release() {
        let mut t = tracker();
        assert_eq!(t.observe(KeyEvent::down(VK_LWIN)), KeyAction::Pass);
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Fire);
        assert!(t.suppressing_secondary_release());
        assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Suppress);
        assert!(!t.suppressing_secondary_release());
        assert_eq!(t.observe(KeyEvent::up(VK_LWIN)), KeyAction::Pass);
        assert_eq!(t.state(), KeyState::Released);
    }

    #[test]
    fn test_modifier_released_before_secondary() {
        let mut t = tracker();
        t.observe(KeyEvent::down(VK_LWIN));
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Fire);
        assert_eq!(t.observe(KeyEvent::up(VK_LWIN)), KeyAction::Pass);
        assert_eq!(t.state(), KeyState::SwallowingSecondary { modifier_held: false });
        assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Suppress);
        assert_eq!(t.state(), KeyState::Released);

        // Plain D afterwards types normally
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Pass);
        assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Pass);
    }

    #[test]
    fn test_auto_repeat_fires_each_down() {
        let mut t = tracker();
        t.observe(KeyEvent::down(VK_LWIN));
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Fire);
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Fire);
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Fire);
        // One release is owed however many downs fired
        assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Suppress);
        assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Pass);
    }

    #[test]
    fn test_secondary_down_after_modifier_release_passes() {
        let mut t = tracker();
        t.observe(KeyEvent::down(VK_LWIN));
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Fire);
        assert_eq!(t.observe(KeyEvent::up(VK_LWIN)), KeyAction::Pass);

        // Repeats of the still-held D type normally once Win is up
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Pass);
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Pass);
        assert!(t.suppressing_secondary_release());
        assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Suppress);
    }

    #[test]
    fn test_lost_release_does_not_swallow_plain_press() {
        let mut t = tracker();
        t.observe(KeyEvent::down(VK_LWIN));
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Fire);
        // The D release never reaches the hook
        t.observe(KeyEvent::up(VK_LWIN));
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Pass);
    }

    #[test]
    fn test_repeated_presses_fire_each_time() {
        let mut t = tracker();
        t.observe(KeyEvent::down(VK_LWIN));
        for _ in 0..3 {
            assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Fire);
            assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Suppress);
        }
        assert!(t.modifier_down());
    }

    #[test]
    fn test_other_combinations_pass_through() {
        let mut t = tracker();
        t.observe(KeyEvent::down(VK_LWIN));
        assert_eq!(t.observe(KeyEvent::down(VK_R)), KeyAction::Pass);
        assert_eq!(t.observe(KeyEvent::up(VK_R)), KeyAction::Pass);
        assert_eq!(t.observe(KeyEvent::down(VK_SHIFT)), KeyAction::Pass);
        assert_eq!(t.observe(KeyEvent::up(VK_SHIFT)), KeyAction::Pass);
        assert_eq!(t.observe(KeyEvent::up(VK_LWIN)), KeyAction::Pass);
    }

    #[test]
    fn test_secondary_without_modifier_passes() {
        let mut t = tracker();
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Pass);
        // Modifier pressed while D is already held: the held D does not fire
        assert_eq!(t.observe(KeyEvent::down(VK_LWIN)), KeyAction::Pass);
        assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Pass);
    }

    #[test]
    fn test_stray_release_passes() {
        let mut t = tracker();
        t.observe(KeyEvent::down(VK_LWIN));
        assert_eq!(t.observe(KeyEvent::up(VK_D)), KeyAction::Pass);
        assert_eq!(t.state(), KeyState::ModifierHeld);
    }

    #[test]
    fn test_left_and_right_share_state() {
        let mut t = tracker();
        t.observe(KeyEvent::down(VK_LWIN));
        t.observe(KeyEvent::down(VK_RWIN));
        t.observe(KeyEvent::up(VK_RWIN));
        // Tracking is per modifier, not per instance
        assert!(!t.modifier_down());
        assert_eq!(t.observe(KeyEvent::down(VK_D)), KeyAction::Pass);
    }

    #[test]
    fn test_action_suppresses() {
        assert!(!KeyAction::Pass.suppresses());
        assert!(KeyAction::Suppress.suppresses());
        assert!(KeyAction::Fire.suppresses());
    }
}
