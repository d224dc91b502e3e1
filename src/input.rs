use macroquad::prelude::*;

use crate::player::PlayerIntent;

/// Hotbar keys, in slot order.
const SLOT_KEYS: [KeyCode; 10] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
    KeyCode::Key0,
];

fn any_down(keys: &[KeyCode]) -> bool {
    keys.iter().any(|k| is_key_down(*k))
}

/// Snapshot the keyboard into this frame's intent. Returns an idle intent while egui has focus.
pub fn read_intent(keyboard_captured: bool) -> PlayerIntent {
    if keyboard_captured {
        return PlayerIntent::default();
    }
    PlayerIntent {
        up: any_down(&[KeyCode::W, KeyCode::Up]),
        down: any_down(&[KeyCode::S, KeyCode::Down]),
        left: any_down(&[KeyCode::A, KeyCode::Left]),
        right: any_down(&[KeyCode::D, KeyCode::Right]),
        interact: is_key_pressed(KeyCode::E),
        use_item: is_key_pressed(KeyCode::Q),
        shelter: is_key_pressed(KeyCode::F),
        select_slot: SLOT_KEYS.iter().position(|k| is_key_pressed(*k)),
    }
}
