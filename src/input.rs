use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Normalized per-frame movement intent, decoupled from raw key bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
}

impl MoveInput {
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
    mouse_delta: (f32, f32),
    pub cursor_grabbed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            cursor_grabbed: false,
        }
    }

    pub fn handle_key_press(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
    }

    pub fn handle_mouse_move(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        let delta = self.mouse_delta;
        self.mouse_delta = (0.0, 0.0);
        delta
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Snapshot of the WASD/shift/space state as boolean move flags.
    pub fn move_input(&self) -> MoveInput {
        MoveInput {
            forward: self.is_pressed(KeyCode::KeyW),
            backward: self.is_pressed(KeyCode::KeyS),
            left: self.is_pressed(KeyCode::KeyA),
            right: self.is_pressed(KeyCode::KeyD),
            sprint: self.is_pressed(KeyCode::ShiftLeft) || self.is_pressed(KeyCode::ShiftRight),
        }
    }

    /// Drop all held keys, e.g. when the window loses focus or the menu opens.
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
        self.mouse_delta = (0.0, 0.0);
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
