use std::collections::HashSet;

use super::types::{InputEvent, Key};

/// Per-frame input deltas.
///
/// `InputState` holds what is currently down; `InputFrame` holds what changed
/// since the last frame. The runtime clears it after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// True if `key` went down this frame (repeats excluded).
    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputState, KeyState};

    #[test]
    fn clear_drops_only_this_frames_transitions() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Key { key: Key::Space, state: KeyState::Pressed, repeat: false });
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 1.0, y: 2.0 });
        assert_eq!(frame.events.len(), 2);

        frame.clear();
        assert!(frame.events.is_empty());
        assert!(!frame.key_pressed(Key::Space));
        assert!(state.key_down(Key::Space));
        assert_eq!(state.pointer_pos, Some((1.0, 2.0)));
    }
}
