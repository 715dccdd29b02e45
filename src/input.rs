use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use crate::game::TickInput;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Fire,
    Confirm,
    Pause,
    ToggleMute,
    FocusLost,
    Quit,
}

/// A key that can be held down. Remembers when it was last pressed.
#[derive(Debug, Default, Clone, Copy)]
struct HeldKey {
    pressed_at: Option<Instant>,
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    left: HeldKey,
    right: HeldKey,
    fire: HeldKey,
}

/// Manages input polling and translates raw key events into game actions.
///
/// Terminals without the keyboard enhancement protocol never report key
/// releases. There a key counts as held for `hold_window` after its last
/// press or auto-repeat.
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    reports_release: bool,
    hold_window: Duration,
}

impl InputManager {
    pub fn new(reports_release: bool, hold_window: Duration) -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
            reports_release,
            hold_window,
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        while event::poll(Duration::from_millis(0))? {
            let event = event::read()?;
            self.handle_event(event, Instant::now());
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event, now),
            Event::FocusLost => self.oneshot_actions.push(InputAction::FocusLost),
            _ => {}
        }
    }

    /// Processes a key event and updates key state and one-shot actions
    fn handle_key_event(&mut self, key_event: KeyEvent, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => {
                self.handle_key_press(key_event);
                self.handle_key_hold(key_event.code, now);
            }
            KeyEventKind::Repeat => self.handle_key_hold(key_event.code, now),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    /// One-shot keys, acted on once per press
    fn handle_key_press(&mut self, key_event: KeyEvent) {
        let action = match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                InputAction::Quit
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => InputAction::Quit,
            KeyCode::Enter => InputAction::Confirm,
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => InputAction::Pause,
            KeyCode::Char('m') | KeyCode::Char('M') => InputAction::ToggleMute,
            _ => return,
        };
        self.oneshot_actions.push(action);
    }

    fn handle_key_hold(&mut self, code: KeyCode, now: Instant) {
        let keys = &mut self.key_state;
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                keys.left.pressed_at = Some(now);
                keys.right.pressed_at = None;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                keys.right.pressed_at = Some(now);
                keys.left.pressed_at = None;
            }
            KeyCode::Char(' ') => {
                keys.fire.pressed_at = Some(now);
            }
            _ => {}
        }
    }

    /// Handles key release events
    fn handle_key_release(&mut self, code: KeyCode) {
        let keys = &mut self.key_state;
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => keys.left.pressed_at = None,
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                keys.right.pressed_at = None
            }
            KeyCode::Char(' ') => keys.fire.pressed_at = None,
            _ => {}
        }
    }

    fn is_held(&self, key: HeldKey, now: Instant) -> bool {
        match key.pressed_at {
            Some(_) if self.reports_release => true,
            Some(at) => now.saturating_duration_since(at) < self.hold_window,
            None => false,
        }
    }

    /// Returns all actions for this frame (both continuous and one-shot)
    /// Must be called after poll_events()
    pub fn get_actions(&self, now: Instant) -> Vec<InputAction> {
        let mut actions = self.oneshot_actions.clone();

        if self.is_held(self.key_state.left, now) {
            actions.push(InputAction::MoveLeft);
        }
        if self.is_held(self.key_state.right, now) {
            actions.push(InputAction::MoveRight);
        }
        if self.is_held(self.key_state.fire, now) {
            actions.push(InputAction::Fire);
        }

        actions
    }
}

/// The part of this frame's actions the simulation cares about
pub fn tick_input(actions: &[InputAction]) -> TickInput {
    let mut input = TickInput::default();
    for action in actions {
        match action {
            InputAction::MoveLeft => input.left = true,
            InputAction::MoveRight => input.right = true,
            InputAction::Fire => input.fire = true,
            InputAction::Pause => input.pause = true,
            InputAction::Confirm => input.confirm = true,
            InputAction::ToggleMute | InputAction::FocusLost | InputAction::Quit => {}
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_millis(300);

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn release(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ))
    }

    fn repeat(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        ))
    }

    #[test]
    fn test_oneshot_keys() {
        let now = Instant::now();
        let mut input = InputManager::new(true, HOLD);
        for code in [
            KeyCode::Enter,
            KeyCode::Esc,
            KeyCode::Char('p'),
            KeyCode::Char('M'),
            KeyCode::Char('q'),
        ] {
            input.handle_event(press(code), now);
        }
        assert_eq!(
            input.get_actions(now),
            vec![
                InputAction::Confirm,
                InputAction::Pause,
                InputAction::Pause,
                InputAction::ToggleMute,
                InputAction::Quit,
            ]
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        let now = Instant::now();
        let mut input = InputManager::new(true, HOLD);
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        input.handle_event(event, now);
        assert_eq!(input.get_actions(now), vec![InputAction::Quit]);
    }

    #[test]
    fn test_focus_lost() {
        let now = Instant::now();
        let mut input = InputManager::new(true, HOLD);
        input.handle_event(Event::FocusLost, now);
        input.handle_event(Event::FocusGained, now);
        assert_eq!(input.get_actions(now), vec![InputAction::FocusLost]);
    }

    #[test]
    fn test_held_until_release() {
        let now = Instant::now();
        let mut input = InputManager::new(true, HOLD);
        input.handle_event(press(KeyCode::Left), now);
        input.handle_event(press(KeyCode::Char(' ')), now);

        let later = now + Duration::from_secs(5);
        assert_eq!(
            input.get_actions(later),
            vec![InputAction::MoveLeft, InputAction::Fire]
        );

        input.handle_event(release(KeyCode::Left), later);
        assert_eq!(input.get_actions(later), vec![InputAction::Fire]);
    }

    #[test]
    fn test_hold_window_without_release_events() {
        let now = Instant::now();
        let mut input = InputManager::new(false, HOLD);
        input.handle_event(press(KeyCode::Char('d')), now);

        assert_eq!(
            input.get_actions(now + Duration::from_millis(299)),
            vec![InputAction::MoveRight]
        );
        assert!(input.get_actions(now + HOLD).is_empty());
    }

    #[test]
    fn test_repeat_extends_hold() {
        let now = Instant::now();
        let mut input = InputManager::new(false, HOLD);
        input.handle_event(press(KeyCode::Char(' ')), now);
        let later = now + Duration::from_millis(250);
        input.handle_event(repeat(KeyCode::Char(' ')), later);

        assert_eq!(
            input.get_actions(now + Duration::from_millis(500)),
            vec![InputAction::Fire]
        );
    }

    #[test]
    fn test_opposite_direction_cancels() {
        let now = Instant::now();
        let mut input = InputManager::new(true, HOLD);
        input.handle_event(press(KeyCode::Char('a')), now);
        input.handle_event(press(KeyCode::Right), now);
        assert_eq!(input.get_actions(now), vec![InputAction::MoveRight]);
    }

    #[test]
    fn test_tick_input_from_actions() {
        let actions = [
            InputAction::MoveLeft,
            InputAction::Fire,
            InputAction::Confirm,
            InputAction::ToggleMute,
        ];
        let input = tick_input(&actions);
        assert!(input.left);
        assert!(!input.right);
        assert!(input.fire);
        assert!(input.confirm);
        assert!(!input.pause);
        assert_eq!(input.direction(), -1.0);
    }
}
