use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current input state for the window.
///
/// Holds held keys and the pointer position. Per-frame
/// transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event to the current state and writes transitions to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered to unfocused windows.
                    self.keys_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((*x, *y)),

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },
        }

        frame.push_event(ev);
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn press_records_transition_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed, false));
        assert!(state.key_down(Key::Space));
        assert!(frame.key_pressed(Key::Space));

        frame.clear();
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed, true));
        assert!(state.key_down(Key::Space));
        assert!(!frame.key_pressed(Key::Space));
        assert_eq!(frame.events.len(), 1);
    }

    #[test]
    fn release_records_transition() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::R, KeyState::Pressed, false));
        frame.clear();
        state.apply_event(&mut frame, key(Key::R, KeyState::Released, false));

        assert!(!state.key_down(Key::R));
        assert!(frame.key_released(Key::R));
        assert!(!frame.key_pressed(Key::R));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::A, KeyState::Released, false));
        assert!(!frame.key_released(Key::A));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed, false));
        state.apply_event(&mut frame, key(Key::Shift, KeyState::Pressed, false));
        assert!(state.key_down(Key::ArrowUp));

        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.focused);
        assert!(state.keys_down.is_empty());
    }

    #[test]
    fn pointer_tracks_and_leaves() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 10.0, y: 20.0 });
        assert_eq!(state.pointer_pos, Some((10.0, 20.0)));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }
}
