use crate::layout::{KeyDef, Layout};
use crate::types::Dimensions;
use lazy_static::lazy_static;
use std::collections::HashMap;

// Key codes from the HID usage tables, keyboard page.
pub const KEY_A: u8 = 0x04;
pub const KEY_B: u8 = 0x05;
pub const KEY_C: u8 = 0x06;
pub const KEY_D: u8 = 0x07;
pub const KEY_E: u8 = 0x08;
pub const KEY_F: u8 = 0x09;
pub const KEY_G: u8 = 0x0A;
pub const KEY_H: u8 = 0x0B;
pub const KEY_I: u8 = 0x0C;
pub const KEY_J: u8 = 0x0D;
pub const KEY_K: u8 = 0x0E;
pub const KEY_L: u8 = 0x0F;
pub const KEY_M: u8 = 0x10;
pub const KEY_N: u8 = 0x11;
pub const KEY_O: u8 = 0x12;
pub const KEY_P: u8 = 0x13;
pub const KEY_Q: u8 = 0x14;
pub const KEY_R: u8 = 0x15;
pub const KEY_S: u8 = 0x16;
pub const KEY_T: u8 = 0x17;
pub const KEY_U: u8 = 0x18;
pub const KEY_V: u8 = 0x19;
pub const KEY_W: u8 = 0x1A;
pub const KEY_X: u8 = 0x1B;
pub const KEY_Y: u8 = 0x1C;
pub const KEY_Z: u8 = 0x1D;
pub const KEY_1: u8 = 0x1E;
pub const KEY_2: u8 = 0x1F;
pub const KEY_3: u8 = 0x20;
pub const KEY_4: u8 = 0x21;
pub const KEY_5: u8 = 0x22;
pub const KEY_6: u8 = 0x23;
pub const KEY_7: u8 = 0x24;
pub const KEY_8: u8 = 0x25;
pub const KEY_9: u8 = 0x26;
pub const KEY_0: u8 = 0x27;
pub const KEY_ENTER: u8 = 0x28;
pub const KEY_ESC: u8 = 0x29;
pub const KEY_BACKSPACE: u8 = 0x2A;
pub const KEY_TAB: u8 = 0x2B;
pub const KEY_SPACE: u8 = 0x2C;
pub const KEY_MINUS: u8 = 0x2D;
pub const KEY_EQUAL: u8 = 0x2E;
pub const KEY_LEFT_BRACE: u8 = 0x2F;
pub const KEY_RIGHT_BRACE: u8 = 0x30;
pub const KEY_BACKSLASH: u8 = 0x31;
pub const KEY_SEMICOLON: u8 = 0x33;
pub const KEY_QUOTE: u8 = 0x34;
pub const KEY_GRAVE: u8 = 0x35;
pub const KEY_COMMA: u8 = 0x36;
pub const KEY_PERIOD: u8 = 0x37;
pub const KEY_SLASH: u8 = 0x38;
pub const KEY_CAPS_LOCK: u8 = 0x39;
pub const KEY_F1: u8 = 0x3A;
pub const KEY_F2: u8 = 0x3B;
pub const KEY_F3: u8 = 0x3C;
pub const KEY_F4: u8 = 0x3D;
pub const KEY_F5: u8 = 0x3E;
pub const KEY_F6: u8 = 0x3F;
pub const KEY_F7: u8 = 0x40;
pub const KEY_F8: u8 = 0x41;
pub const KEY_F9: u8 = 0x42;
pub const KEY_F10: u8 = 0x43;
pub const KEY_F11: u8 = 0x44;
pub const KEY_F12: u8 = 0x45;
pub const KEY_PRINT_SCREEN: u8 = 0x46;
pub const KEY_SCROLL_LOCK: u8 = 0x47;
pub const KEY_PAUSE: u8 = 0x48;
pub const KEY_INSERT: u8 = 0x49;
pub const KEY_HOME: u8 = 0x4A;
pub const KEY_PAGE_UP: u8 = 0x4B;
pub const KEY_DELETE: u8 = 0x4C;
pub const KEY_END: u8 = 0x4D;
pub const KEY_PAGE_DOWN: u8 = 0x4E;
pub const KEY_RIGHT: u8 = 0x4F;
pub const KEY_LEFT: u8 = 0x50;
pub const KEY_DOWN: u8 = 0x51;
pub const KEY_UP: u8 = 0x52;
pub const KEY_NON_US_BACKSLASH: u8 = 0x64;
pub const KEY_APPLICATION: u8 = 0x65;

// Modifier mask bits, boot-protocol order.
pub const MOD_LEFT_CTRL: u8 = 0x01;
pub const MOD_LEFT_SHIFT: u8 = 0x02;
pub const MOD_LEFT_ALT: u8 = 0x04;
pub const MOD_LEFT_GUI: u8 = 0x08;
pub const MOD_RIGHT_CTRL: u8 = 0x10;
pub const MOD_RIGHT_SHIFT: u8 = 0x20;
pub const MOD_RIGHT_ALT: u8 = 0x40;
pub const MOD_RIGHT_GUI: u8 = 0x80;

/// Key names accepted by the text keymap format.
pub const KEY_NAMES: &[(&str, KeyDef)] = &[
    ("a", KeyDef::Key(KEY_A)),
    ("b", KeyDef::Key(KEY_B)),
    ("c", KeyDef::Key(KEY_C)),
    ("d", KeyDef::Key(KEY_D)),
    ("e", KeyDef::Key(KEY_E)),
    ("f", KeyDef::Key(KEY_F)),
    ("g", KeyDef::Key(KEY_G)),
    ("h", KeyDef::Key(KEY_H)),
    ("i", KeyDef::Key(KEY_I)),
    ("j", KeyDef::Key(KEY_J)),
    ("k", KeyDef::Key(KEY_K)),
    ("l", KeyDef::Key(KEY_L)),
    ("m", KeyDef::Key(KEY_M)),
    ("n", KeyDef::Key(KEY_N)),
    ("o", KeyDef::Key(KEY_O)),
    ("p", KeyDef::Key(KEY_P)),
    ("q", KeyDef::Key(KEY_Q)),
    ("r", KeyDef::Key(KEY_R)),
    ("s", KeyDef::Key(KEY_S)),
    ("t", KeyDef::Key(KEY_T)),
    ("u", KeyDef::Key(KEY_U)),
    ("v", KeyDef::Key(KEY_V)),
    ("w", KeyDef::Key(KEY_W)),
    ("x", KeyDef::Key(KEY_X)),
    ("y", KeyDef::Key(KEY_Y)),
    ("z", KeyDef::Key(KEY_Z)),
    ("1", KeyDef::Key(KEY_1)),
    ("2", KeyDef::Key(KEY_2)),
    ("3", KeyDef::Key(KEY_3)),
    ("4", KeyDef::Key(KEY_4)),
    ("5", KeyDef::Key(KEY_5)),
    ("6", KeyDef::Key(KEY_6)),
    ("7", KeyDef::Key(KEY_7)),
    ("8", KeyDef::Key(KEY_8)),
    ("9", KeyDef::Key(KEY_9)),
    ("0", KeyDef::Key(KEY_0)),
    ("enter", KeyDef::Key(KEY_ENTER)),
    ("esc", KeyDef::Key(KEY_ESC)),
    ("bspc", KeyDef::Key(KEY_BACKSPACE)),
    ("tab", KeyDef::Key(KEY_TAB)),
    ("space", KeyDef::Key(KEY_SPACE)),
    ("minus", KeyDef::Key(KEY_MINUS)),
    ("equal", KeyDef::Key(KEY_EQUAL)),
    ("lbrc", KeyDef::Key(KEY_LEFT_BRACE)),
    ("rbrc", KeyDef::Key(KEY_RIGHT_BRACE)),
    ("bslash", KeyDef::Key(KEY_BACKSLASH)),
    ("semi", KeyDef::Key(KEY_SEMICOLON)),
    ("quote", KeyDef::Key(KEY_QUOTE)),
    ("grave", KeyDef::Key(KEY_GRAVE)),
    ("comma", KeyDef::Key(KEY_COMMA)),
    ("dot", KeyDef::Key(KEY_PERIOD)),
    ("slash", KeyDef::Key(KEY_SLASH)),
    ("caps", KeyDef::Key(KEY_CAPS_LOCK)),
    ("f1", KeyDef::Key(KEY_F1)),
    ("f2", KeyDef::Key(KEY_F2)),
    ("f3", KeyDef::Key(KEY_F3)),
    ("f4", KeyDef::Key(KEY_F4)),
    ("f5", KeyDef::Key(KEY_F5)),
    ("f6", KeyDef::Key(KEY_F6)),
    ("f7", KeyDef::Key(KEY_F7)),
    ("f8", KeyDef::Key(KEY_F8)),
    ("f9", KeyDef::Key(KEY_F9)),
    ("f10", KeyDef::Key(KEY_F10)),
    ("f11", KeyDef::Key(KEY_F11)),
    ("f12", KeyDef::Key(KEY_F12)),
    ("prtsc", KeyDef::Key(KEY_PRINT_SCREEN)),
    ("slck", KeyDef::Key(KEY_SCROLL_LOCK)),
    ("pause", KeyDef::Key(KEY_PAUSE)),
    ("ins", KeyDef::Key(KEY_INSERT)),
    ("home", KeyDef::Key(KEY_HOME)),
    ("pgup", KeyDef::Key(KEY_PAGE_UP)),
    ("del", KeyDef::Key(KEY_DELETE)),
    ("end", KeyDef::Key(KEY_END)),
    ("pgdn", KeyDef::Key(KEY_PAGE_DOWN)),
    ("right", KeyDef::Key(KEY_RIGHT)),
    ("left", KeyDef::Key(KEY_LEFT)),
    ("down", KeyDef::Key(KEY_DOWN)),
    ("up", KeyDef::Key(KEY_UP)),
    ("nubs", KeyDef::Key(KEY_NON_US_BACKSLASH)),
    ("app", KeyDef::Key(KEY_APPLICATION)),
    ("lctrl", KeyDef::Modifier(MOD_LEFT_CTRL)),
    ("lshift", KeyDef::Modifier(MOD_LEFT_SHIFT)),
    ("lalt", KeyDef::Modifier(MOD_LEFT_ALT)),
    ("lgui", KeyDef::Modifier(MOD_LEFT_GUI)),
    ("rctrl", KeyDef::Modifier(MOD_RIGHT_CTRL)),
    ("rshift", KeyDef::Modifier(MOD_RIGHT_SHIFT)),
    ("ralt", KeyDef::Modifier(MOD_RIGHT_ALT)),
    ("rgui", KeyDef::Modifier(MOD_RIGHT_GUI)),
];

lazy_static! {
    static ref NAME_TO_DEF: HashMap<&'static str, KeyDef> =
        KEY_NAMES.iter().copied().collect();
    static ref CODE_TO_NAME: HashMap<u8, &'static str> = KEY_NAMES
        .iter()
        .filter_map(|&(name, def)| match def {
            KeyDef::Key(code) => Some((code, name)),
            _ => None,
        })
        .collect();
}

/// Definition for a key name; `--` names an unused position.
pub fn lookup(name: &str) -> Option<KeyDef> {
    if name == "--" {
        return Some(KeyDef::Unused);
    }
    NAME_TO_DEF.get(name).copied()
}

/// Name for a report slot code, for logs and demos.
pub fn code_name(code: u8) -> Option<&'static str> {
    CODE_TO_NAME.get(&code).copied()
}

/// Built-in 6-row by 17-column tenkeyless board, positions listed column by
/// column. Serves as a realistic fixture for tests, benches and examples.
pub fn tenkeyless() -> Layout {
    use KeyDef::{Key, Modifier, Unused};
    let defs = vec![
        // col 0
        Modifier(MOD_LEFT_CTRL),
        Modifier(MOD_LEFT_SHIFT),
        Key(KEY_CAPS_LOCK),
        Key(KEY_TAB),
        Key(KEY_1),
        Key(KEY_ESC),
        // col 1
        Modifier(MOD_LEFT_GUI),
        Key(KEY_NON_US_BACKSLASH),
        Key(KEY_A),
        Key(KEY_Q),
        Key(KEY_2),
        Key(KEY_GRAVE),
        // col 2
        Modifier(MOD_LEFT_ALT),
        Key(KEY_Z),
        Key(KEY_S),
        Key(KEY_W),
        Key(KEY_3),
        Key(KEY_F1),
        // col 3
        Unused,
        Key(KEY_X),
        Key(KEY_D),
        Key(KEY_E),
        Key(KEY_4),
        Key(KEY_F2),
        // col 4
        Unused,
        Key(KEY_C),
        Key(KEY_F),
        Key(KEY_R),
        Key(KEY_5),
        Key(KEY_F3),
        // col 5
        Unused,
        Key(KEY_V),
        Key(KEY_G),
        Key(KEY_T),
        Key(KEY_6),
        Key(KEY_F4),
        // col 6
        Unused,
        Key(KEY_B),
        Key(KEY_H),
        Key(KEY_Y),
        Key(KEY_7),
        Key(KEY_F5),
        // col 7
        Key(KEY_SPACE),
        Key(KEY_N),
        Key(KEY_J),
        Key(KEY_U),
        Key(KEY_8),
        Key(KEY_F6),
        // col 8
        Unused,
        Key(KEY_M),
        Key(KEY_K),
        Key(KEY_I),
        Key(KEY_9),
        Key(KEY_F7),
        // col 9
        Unused,
        Key(KEY_COMMA),
        Key(KEY_L),
        Key(KEY_O),
        Key(KEY_0),
        Key(KEY_F8),
        // col 10
        Modifier(MOD_RIGHT_ALT),
        Key(KEY_PERIOD),
        Key(KEY_SEMICOLON),
        Key(KEY_P),
        Key(KEY_MINUS),
        Key(KEY_F9),
        // col 11
        Modifier(MOD_RIGHT_GUI),
        Key(KEY_SLASH),
        Key(KEY_QUOTE),
        Key(KEY_LEFT_BRACE),
        Key(KEY_EQUAL),
        Key(KEY_F10),
        // col 12
        Key(KEY_APPLICATION),
        Unused,
        Key(KEY_BACKSLASH),
        Key(KEY_RIGHT_BRACE),
        Unused,
        Key(KEY_F11),
        // col 13
        Modifier(MOD_RIGHT_CTRL),
        Modifier(MOD_RIGHT_SHIFT),
        Key(KEY_ENTER),
        Key(KEY_BACKSLASH),
        Key(KEY_BACKSPACE),
        Key(KEY_F12),
        // col 14
        Key(KEY_LEFT),
        Unused,
        Unused,
        Key(KEY_DELETE),
        Key(KEY_INSERT),
        Key(KEY_PRINT_SCREEN),
        // col 15
        Key(KEY_DOWN),
        Key(KEY_UP),
        Unused,
        Key(KEY_END),
        Key(KEY_HOME),
        Key(KEY_SCROLL_LOCK),
        // col 16
        Key(KEY_RIGHT),
        Unused,
        Unused,
        Key(KEY_PAGE_DOWN),
        Key(KEY_PAGE_UP),
        Key(KEY_PAUSE),
    ];
    Layout::from_checked_parts(Dimensions::new(6, 17), defs)
}
