//! winit 0.30 event translation.

use ::winit::dpi::PhysicalPosition;
use ::winit::event::{ElementState, WindowEvent};
use ::winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use ::winit::window::Window;

use crate::input::{InputEvent, Key, KeyState, Modifiers};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events the input subsystem does not track.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            Some(InputEvent::PointerMoved { x, y })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let st = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };
            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state: st,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Unknown(0);
    };
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::Backspace => Key::Backspace,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        other => Key::Unknown(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_arrows_map() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyR)), Key::R);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowDown)), Key::ArrowDown);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)), Key::Shift);
    }

    #[test]
    fn unmapped_keys_are_unknown() {
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::F5)), Key::Unknown(_)));
    }
}
