//! Player input delivered to input-capable components
//!
//! The registry keeps track of which component types opted in to input (see
//! [`Component::as_input_mut`]) and fans every [`InputEvent`] out to all live
//! instances of those types. Each instance carries its own [`InputState`],
//! whose per-frame deltas are cleared after every update pass.

use super::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Platform key code.
pub type Key = u32;

/// Physical key location.
pub type Scancode = u32;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

/// Modifier keys held during a key or button event.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CONTROL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);
    pub const SUPER: Self = Self(1 << 3);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyPress { key: Key, scancode: Scancode, mods: Modifiers },
    KeyRelease { key: Key, scancode: Scancode, mods: Modifiers },
    Character(char),
    MouseButtonPress { button: MouseButton, mods: Modifiers },
    MouseButtonRelease { button: MouseButton, mods: Modifiers },
    /// Cursor moved with no button held.
    MouseMove(Vec2),
    /// Cursor teleported without user motion, e.g. when re-enabling it.
    MouseJump(Vec2),
    /// Cursor moved with a button held since `origin`.
    MouseDrag { origin: Vec2, position: Vec2 },
    MouseScroll(Vec2),
}

/// Input seen by one component instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pressed_keys: BTreeSet<Key>,
    pressed_scancodes: BTreeSet<Scancode>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    mouse_scroll: Vec2,
    got_mouse: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn is_scancode_pressed(&self, scancode: Scancode) -> bool {
        self.pressed_scancodes.contains(&scancode)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Cursor motion since the previous update pass.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn mouse_scroll(&self) -> Vec2 {
        self.mouse_scroll
    }

    /// Clear the per-frame values. Pressed keys and position persist.
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.mouse_scroll = Vec2::ZERO;
    }

    /// Fold `event` into the state.
    ///
    /// The first cursor event only records a position; a delta needs two.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyPress { key, scancode, .. } => {
                self.pressed_keys.insert(key);
                self.pressed_scancodes.insert(scancode);
            }
            InputEvent::KeyRelease { key, scancode, .. } => {
                self.pressed_keys.remove(&key);
                self.pressed_scancodes.remove(&scancode);
            }
            InputEvent::MouseMove(position) | InputEvent::MouseDrag { position, .. } => {
                if self.got_mouse {
                    self.mouse_delta = position - self.mouse_position;
                }
                self.mouse_position = position;
                self.got_mouse = true;
            }
            InputEvent::MouseJump(position) => {
                self.mouse_delta = Vec2::ZERO;
                self.mouse_position = position;
                self.got_mouse = true;
            }
            InputEvent::MouseScroll(scroll) => self.mouse_scroll = scroll,
            InputEvent::Character(_)
            | InputEvent::MouseButtonPress { .. }
            | InputEvent::MouseButtonRelease { .. } => {}
        }
    }
}

/// A component that reacts to player input.
///
/// State bookkeeping happens before the matching hook runs, so a hook
/// already sees the updated [`InputState`].
pub trait InputComponent: Component {
    fn input_state(&self) -> &InputState;

    fn input_state_mut(&mut self) -> &mut InputState;

    fn on_key_press(&mut self, _key: Key, _scancode: Scancode, _mods: Modifiers) {}

    fn on_key_release(&mut self, _key: Key, _scancode: Scancode, _mods: Modifiers) {}

    fn on_character(&mut self, _character: char) {}

    fn on_mouse_button_press(&mut self, _button: MouseButton, _mods: Modifiers) {}

    fn on_mouse_button_release(&mut self, _button: MouseButton, _mods: Modifiers) {}

    /// Also called for jumps, with the new position.
    fn on_mouse_move(&mut self, _position: Vec2) {}

    fn on_mouse_drag(&mut self, _origin: Vec2, _position: Vec2) {}

    fn on_mouse_scroll(&mut self, _scroll: Vec2) {}
}

/// Update `component`'s state with `event`, then run its hook.
pub fn deliver(component: &mut dyn InputComponent, event: &InputEvent) {
    component.input_state_mut().apply(event);
    match *event {
        InputEvent::KeyPress { key, scancode, mods } => component.on_key_press(key, scancode, mods),
        InputEvent::KeyRelease { key, scancode, mods } => {
            component.on_key_release(key, scancode, mods)
        }
        InputEvent::Character(character) => component.on_character(character),
        InputEvent::MouseButtonPress { button, mods } => {
            component.on_mouse_button_press(button, mods)
        }
        InputEvent::MouseButtonRelease { button, mods } => {
            component.on_mouse_button_release(button, mods)
        }
        InputEvent::MouseMove(position) | InputEvent::MouseJump(position) => {
            component.on_mouse_move(position)
        }
        InputEvent::MouseDrag { origin, position } => component.on_mouse_drag(origin, position),
        InputEvent::MouseScroll(scroll) => component.on_mouse_scroll(scroll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Camera {
        input: InputState,
        keys_seen: Vec<Key>,
        drags: u32,
    }

    impl Component for Camera {
        fn as_input_mut(&mut self) -> Option<&mut dyn InputComponent> {
            Some(self)
        }
    }

    impl InputComponent for Camera {
        fn input_state(&self) -> &InputState {
            &self.input
        }

        fn input_state_mut(&mut self) -> &mut InputState {
            &mut self.input
        }

        fn on_key_press(&mut self, key: Key, _scancode: Scancode, _mods: Modifiers) {
            assert!(self.input.is_key_pressed(key));
            self.keys_seen.push(key);
        }

        fn on_mouse_drag(&mut self, _origin: Vec2, _position: Vec2) {
            self.drags += 1;
        }
    }

    #[test]
    fn keys_are_tracked() {
        let mut camera = Camera::default();
        let press = InputEvent::KeyPress { key: 87, scancode: 17, mods: Modifiers::NONE };
        deliver(&mut camera, &press);

        assert!(camera.input_state().is_key_pressed(87));
        assert!(camera.input_state().is_scancode_pressed(17));
        assert_eq!(camera.keys_seen, vec![87]);

        let release = InputEvent::KeyRelease { key: 87, scancode: 17, mods: Modifiers::SHIFT };
        deliver(&mut camera, &release);
        assert!(!camera.input_state().is_key_pressed(87));
        assert!(!camera.input_state().is_scancode_pressed(17));
    }

    #[test]
    fn first_move_has_no_delta() {
        let mut state = InputState::new();
        state.apply(&InputEvent::MouseMove(Vec2::new(10.0, 10.0)));
        assert_eq!(state.mouse_delta(), Vec2::ZERO);

        state.apply(&InputEvent::MouseMove(Vec2::new(13.0, 6.0)));
        assert_eq!(state.mouse_delta(), Vec2::new(3.0, -4.0));
        assert_eq!(state.mouse_position(), Vec2::new(13.0, 6.0));
    }

    #[test]
    fn jump_clears_delta() {
        let mut state = InputState::new();
        state.apply(&InputEvent::MouseMove(Vec2::ZERO));
        state.apply(&InputEvent::MouseMove(Vec2::ONE));
        state.apply(&InputEvent::MouseJump(Vec2::new(100.0, 100.0)));
        assert_eq!(state.mouse_delta(), Vec2::ZERO);
        assert_eq!(state.mouse_position(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn drag_updates_delta_and_hook() {
        let mut camera = Camera::default();
        deliver(&mut camera, &InputEvent::MouseMove(Vec2::ZERO));
        deliver(
            &mut camera,
            &InputEvent::MouseDrag { origin: Vec2::ZERO, position: Vec2::new(2.0, 0.0) },
        );
        assert_eq!(camera.drags, 1);
        assert_eq!(camera.input_state().mouse_delta(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn reset_keeps_pressed_keys() {
        let mut state = InputState::new();
        state.apply(&InputEvent::KeyPress { key: 1, scancode: 1, mods: Modifiers::NONE });
        state.apply(&InputEvent::MouseMove(Vec2::ZERO));
        state.apply(&InputEvent::MouseMove(Vec2::X));
        state.apply(&InputEvent::MouseScroll(Vec2::Y));

        state.reset_deltas();
        assert_eq!(state.mouse_delta(), Vec2::ZERO);
        assert_eq!(state.mouse_scroll(), Vec2::ZERO);
        assert_eq!(state.mouse_position(), Vec2::X);
        assert!(state.is_key_pressed(1));
    }

    #[test]
    fn modifiers_combine() {
        let mods = Modifiers::SHIFT | Modifiers::CONTROL;
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::ALT));
    }
}
