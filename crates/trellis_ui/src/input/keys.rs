//! Key codes, modifier masks, pointer buttons and gamepad axes.
//!
//! Key codes follow the virtual-key numbering most desktop toolkits report,
//! so device glue can usually pass them through unchanged.

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Any other button, by device index.
    Other(u8),
}

/// Modifier mask bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers;

impl Modifiers {
    /// Control key.
    pub const CTRL: u32 = 1 << 0;
    /// Alt key.
    pub const ALT: u32 = 1 << 1;
    /// Alt-graph key.
    pub const ALT_GRAPH: u32 = 1 << 2;
    /// Shift key.
    pub const SHIFT: u32 = 1 << 3;
    /// Meta key.
    pub const META: u32 = 1 << 4;
    /// Windows / super key.
    pub const WIN: u32 = 1 << 5;
}

/// A keyboard key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

#[allow(missing_docs)]
impl KeyCode {
    pub const UNDEFINED: Self = Self(0);
    pub const CANCEL: Self = Self(3);
    pub const BACK_SPACE: Self = Self(8);
    pub const TAB: Self = Self(9);
    pub const ENTER: Self = Self(10);
    pub const CLEAR: Self = Self(12);
    pub const SHIFT: Self = Self(16);
    pub const CONTROL: Self = Self(17);
    pub const ALT: Self = Self(18);
    pub const PAUSE: Self = Self(19);
    pub const CAPS_LOCK: Self = Self(20);
    pub const ESCAPE: Self = Self(27);
    pub const SPACE: Self = Self(32);
    pub const PAGE_UP: Self = Self(33);
    pub const PAGE_DOWN: Self = Self(34);
    pub const END: Self = Self(35);
    pub const HOME: Self = Self(36);
    pub const LEFT: Self = Self(37);
    pub const UP: Self = Self(38);
    pub const RIGHT: Self = Self(39);
    pub const DOWN: Self = Self(40);
    pub const COMMA: Self = Self(44);
    pub const MINUS: Self = Self(45);
    pub const PERIOD: Self = Self(46);
    pub const SLASH: Self = Self(47);
    pub const NUM_0: Self = Self(48);
    pub const NUM_1: Self = Self(49);
    pub const NUM_2: Self = Self(50);
    pub const NUM_3: Self = Self(51);
    pub const NUM_4: Self = Self(52);
    pub const NUM_5: Self = Self(53);
    pub const NUM_6: Self = Self(54);
    pub const NUM_7: Self = Self(55);
    pub const NUM_8: Self = Self(56);
    pub const NUM_9: Self = Self(57);
    pub const SEMICOLON: Self = Self(59);
    pub const EQUALS: Self = Self(61);
    pub const A: Self = Self(65);
    pub const B: Self = Self(66);
    pub const C: Self = Self(67);
    pub const D: Self = Self(68);
    pub const E: Self = Self(69);
    pub const F: Self = Self(70);
    pub const G: Self = Self(71);
    pub const H: Self = Self(72);
    pub const I: Self = Self(73);
    pub const J: Self = Self(74);
    pub const K: Self = Self(75);
    pub const L: Self = Self(76);
    pub const M: Self = Self(77);
    pub const N: Self = Self(78);
    pub const O: Self = Self(79);
    pub const P: Self = Self(80);
    pub const Q: Self = Self(81);
    pub const R: Self = Self(82);
    pub const S: Self = Self(83);
    pub const T: Self = Self(84);
    pub const U: Self = Self(85);
    pub const V: Self = Self(86);
    pub const W: Self = Self(87);
    pub const X: Self = Self(88);
    pub const Y: Self = Self(89);
    pub const Z: Self = Self(90);
    pub const OPEN_BRACKET: Self = Self(91);
    pub const BACK_SLASH: Self = Self(92);
    pub const CLOSE_BRACKET: Self = Self(93);
    pub const NUMPAD_0: Self = Self(96);
    pub const NUMPAD_1: Self = Self(97);
    pub const NUMPAD_2: Self = Self(98);
    pub const NUMPAD_3: Self = Self(99);
    pub const NUMPAD_4: Self = Self(100);
    pub const NUMPAD_5: Self = Self(101);
    pub const NUMPAD_6: Self = Self(102);
    pub const NUMPAD_7: Self = Self(103);
    pub const NUMPAD_8: Self = Self(104);
    pub const NUMPAD_9: Self = Self(105);
    pub const MULTIPLY: Self = Self(106);
    pub const ADD: Self = Self(107);
    pub const SEPARATOR: Self = Self(108);
    pub const SUBTRACT: Self = Self(109);
    pub const DECIMAL: Self = Self(110);
    pub const DIVIDE: Self = Self(111);
    pub const F1: Self = Self(112);
    pub const F2: Self = Self(113);
    pub const F3: Self = Self(114);
    pub const F4: Self = Self(115);
    pub const F5: Self = Self(116);
    pub const F6: Self = Self(117);
    pub const F7: Self = Self(118);
    pub const F8: Self = Self(119);
    pub const F9: Self = Self(120);
    pub const F10: Self = Self(121);
    pub const F11: Self = Self(122);
    pub const F12: Self = Self(123);
    pub const DELETE: Self = Self(127);
    pub const NUM_LOCK: Self = Self(144);
    pub const SCROLL_LOCK: Self = Self(145);
    pub const PRINTSCREEN: Self = Self(154);
    pub const INSERT: Self = Self(155);
    pub const HELP: Self = Self(156);
    pub const META: Self = Self(157);
    pub const BACK_QUOTE: Self = Self(192);
    pub const QUOTE: Self = Self(222);
    pub const KP_UP: Self = Self(224);
    pub const KP_DOWN: Self = Self(225);
    pub const KP_LEFT: Self = Self(226);
    pub const KP_RIGHT: Self = Self(227);
    pub const WINDOWS: Self = Self(524);
    pub const CONTEXT_MENU: Self = Self(525);
    pub const ALT_GRAPH: Self = Self(65406);
}

impl KeyCode {
    /// Returns the modifier mask bit this key controls, if it is a modifier.
    #[must_use]
    pub fn modifier_mask(self) -> Option<u32> {
        match self {
            Self::CONTROL => Some(Modifiers::CTRL),
            Self::ALT => Some(Modifiers::ALT),
            Self::ALT_GRAPH => Some(Modifiers::ALT_GRAPH),
            Self::META => Some(Modifiers::META),
            Self::SHIFT => Some(Modifiers::SHIFT),
            Self::WINDOWS => Some(Modifiers::WIN),
            _ => None,
        }
    }

    /// Looks up a key by descriptor name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        KEY_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, code)| code)
            .or_else(|| function_key(name))
    }
}

fn function_key(name: &str) -> Option<KeyCode> {
    let digits = name.strip_prefix('f').or_else(|| name.strip_prefix('F'))?;
    let n: u32 = digits.parse().ok()?;
    (1..=12).contains(&n).then(|| KeyCode(KeyCode::F1.0 + n - 1))
}

const KEY_NAMES: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::ENTER),
    ("back_space", KeyCode::BACK_SPACE),
    ("backspace", KeyCode::BACK_SPACE),
    ("bksp", KeyCode::BACK_SPACE),
    ("tab", KeyCode::TAB),
    ("cancel", KeyCode::CANCEL),
    ("clear", KeyCode::CLEAR),
    ("shift", KeyCode::SHIFT),
    ("control", KeyCode::CONTROL),
    ("ctrl", KeyCode::CONTROL),
    ("alt", KeyCode::ALT),
    ("alt_graph", KeyCode::ALT_GRAPH),
    ("altgraph", KeyCode::ALT_GRAPH),
    ("pause", KeyCode::PAUSE),
    ("break", KeyCode::PAUSE),
    ("caps_lock", KeyCode::CAPS_LOCK),
    ("caps", KeyCode::CAPS_LOCK),
    ("escape", KeyCode::ESCAPE),
    ("esc", KeyCode::ESCAPE),
    ("space", KeyCode::SPACE),
    ("sp", KeyCode::SPACE),
    ("page_up", KeyCode::PAGE_UP),
    ("pageup", KeyCode::PAGE_UP),
    ("pgup", KeyCode::PAGE_UP),
    ("page_down", KeyCode::PAGE_DOWN),
    ("pagedown", KeyCode::PAGE_DOWN),
    ("pgdn", KeyCode::PAGE_DOWN),
    ("end", KeyCode::END),
    ("home", KeyCode::HOME),
    ("left", KeyCode::LEFT),
    ("up", KeyCode::UP),
    ("right", KeyCode::RIGHT),
    ("down", KeyCode::DOWN),
    ("comma", KeyCode::COMMA),
    (",", KeyCode::COMMA),
    ("minus", KeyCode::MINUS),
    ("period", KeyCode::PERIOD),
    (".", KeyCode::PERIOD),
    ("slash", KeyCode::SLASH),
    ("/", KeyCode::SLASH),
    ("0", KeyCode::NUM_0),
    ("1", KeyCode::NUM_1),
    ("2", KeyCode::NUM_2),
    ("3", KeyCode::NUM_3),
    ("4", KeyCode::NUM_4),
    ("5", KeyCode::NUM_5),
    ("6", KeyCode::NUM_6),
    ("7", KeyCode::NUM_7),
    ("8", KeyCode::NUM_8),
    ("9", KeyCode::NUM_9),
    ("semicolon", KeyCode::SEMICOLON),
    (";", KeyCode::SEMICOLON),
    ("equals", KeyCode::EQUALS),
    ("=", KeyCode::EQUALS),
    ("a", KeyCode::A),
    ("b", KeyCode::B),
    ("c", KeyCode::C),
    ("d", KeyCode::D),
    ("e", KeyCode::E),
    ("f", KeyCode::F),
    ("g", KeyCode::G),
    ("h", KeyCode::H),
    ("i", KeyCode::I),
    ("j", KeyCode::J),
    ("k", KeyCode::K),
    ("l", KeyCode::L),
    ("m", KeyCode::M),
    ("n", KeyCode::N),
    ("o", KeyCode::O),
    ("p", KeyCode::P),
    ("q", KeyCode::Q),
    ("r", KeyCode::R),
    ("s", KeyCode::S),
    ("t", KeyCode::T),
    ("u", KeyCode::U),
    ("v", KeyCode::V),
    ("w", KeyCode::W),
    ("x", KeyCode::X),
    ("y", KeyCode::Y),
    ("z", KeyCode::Z),
    ("open_bracket", KeyCode::OPEN_BRACKET),
    ("[", KeyCode::OPEN_BRACKET),
    ("back_slash", KeyCode::BACK_SLASH),
    ("backslash", KeyCode::BACK_SLASH),
    ("\\", KeyCode::BACK_SLASH),
    ("close_bracket", KeyCode::CLOSE_BRACKET),
    ("]", KeyCode::CLOSE_BRACKET),
    ("numpad0", KeyCode::NUMPAD_0),
    ("numpad1", KeyCode::NUMPAD_1),
    ("numpad2", KeyCode::NUMPAD_2),
    ("numpad3", KeyCode::NUMPAD_3),
    ("numpad4", KeyCode::NUMPAD_4),
    ("numpad5", KeyCode::NUMPAD_5),
    ("numpad6", KeyCode::NUMPAD_6),
    ("numpad7", KeyCode::NUMPAD_7),
    ("numpad8", KeyCode::NUMPAD_8),
    ("numpad9", KeyCode::NUMPAD_9),
    ("multiply", KeyCode::MULTIPLY),
    ("add", KeyCode::ADD),
    ("separator", KeyCode::SEPARATOR),
    ("subtract", KeyCode::SUBTRACT),
    ("decimal", KeyCode::DECIMAL),
    ("divide", KeyCode::DIVIDE),
    ("delete", KeyCode::DELETE),
    ("del", KeyCode::DELETE),
    ("num_lock", KeyCode::NUM_LOCK),
    ("scroll_lock", KeyCode::SCROLL_LOCK),
    ("printscreen", KeyCode::PRINTSCREEN),
    ("sysrq", KeyCode::PRINTSCREEN),
    ("insert", KeyCode::INSERT),
    ("ins", KeyCode::INSERT),
    ("help", KeyCode::HELP),
    ("meta", KeyCode::META),
    ("back_quote", KeyCode::BACK_QUOTE),
    ("grave", KeyCode::BACK_QUOTE),
    ("`", KeyCode::BACK_QUOTE),
    ("quote", KeyCode::QUOTE),
    ("'", KeyCode::QUOTE),
    ("kp_up", KeyCode::KP_UP),
    ("kp_down", KeyCode::KP_DOWN),
    ("kp_left", KeyCode::KP_LEFT),
    ("kp_right", KeyCode::KP_RIGHT),
    ("windows", KeyCode::WINDOWS),
    ("win", KeyCode::WINDOWS),
    ("context_menu", KeyCode::CONTEXT_MENU),
];

/// Modifier names accepted in keystroke descriptors.
pub(crate) fn modifier_by_name(name: &str) -> Option<u32> {
    const MODIFIER_NAMES: &[(&str, u32)] = &[
        ("shift", Modifiers::SHIFT),
        ("control", Modifiers::CTRL),
        ("ctrl", Modifiers::CTRL),
        ("alt", Modifiers::ALT),
        ("window", Modifiers::WIN),
        ("win", Modifiers::WIN),
        ("meta", Modifiers::META),
    ];
    MODIFIER_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, mask)| mask)
}

/// A gamepad axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    /// Left stick horizontal.
    X,
    /// Left stick vertical.
    Y,
    /// Trigger axis.
    Z,
    /// Right stick horizontal.
    Rx,
    /// Right stick vertical.
    Ry,
    /// Right stick twist.
    Rz,
    /// Point-of-view hat.
    Pov,
}

impl GamepadAxis {
    /// Numeric code used in keystroke descriptors.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
            Self::Rx => 3,
            Self::Ry => 4,
            Self::Rz => 5,
            Self::Pov => 6,
        }
    }
}

/// Hat switch values reported on [`GamepadAxis::Pov`].
pub struct Pov;

#[allow(missing_docs)]
impl Pov {
    pub const CENTER: f32 = 0.0;
    pub const UP_LEFT: f32 = 0.125;
    pub const UP: f32 = 0.25;
    pub const UP_RIGHT: f32 = 0.375;
    pub const RIGHT: f32 = 0.5;
    pub const DOWN_RIGHT: f32 = 0.625;
    pub const DOWN: f32 = 0.75;
    pub const DOWN_LEFT: f32 = 0.875;
    pub const LEFT: f32 = 1.0;
}

/// Named gamepad buttons accepted after `pad`.
pub(crate) fn gamepad_button_by_name(name: &str) -> Option<u32> {
    const BUTTON_NAMES: &[(&str, u32)] = &[
        ("a", 0),
        ("b", 1),
        ("x", 2),
        ("y", 3),
        ("lb", 4),
        ("rb", 5),
        ("back", 6),
        ("start", 7),
        ("lstick", 8),
        ("rstick", 9),
    ];
    BUTTON_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, b)| b)
        .or_else(|| name.parse().ok())
}

/// Axis tap names accepted after `pad`, with their direction.
pub(crate) fn axis_tap_by_name(name: &str) -> Option<(GamepadAxis, bool)> {
    const TAP_NAMES: &[(&str, GamepadAxis, bool)] = &[
        ("x+", GamepadAxis::X, true),
        ("x-", GamepadAxis::X, false),
        ("y+", GamepadAxis::Y, true),
        ("y-", GamepadAxis::Y, false),
        ("z+", GamepadAxis::Z, true),
        ("z-", GamepadAxis::Z, false),
        ("rx+", GamepadAxis::Rx, true),
        ("rx-", GamepadAxis::Rx, false),
        ("ry+", GamepadAxis::Ry, true),
        ("ry-", GamepadAxis::Ry, false),
        ("rz+", GamepadAxis::Rz, true),
        ("rz-", GamepadAxis::Rz, false),
        ("lsx+", GamepadAxis::X, true),
        ("lsx-", GamepadAxis::X, false),
        ("rsx+", GamepadAxis::Rx, true),
        ("rsx-", GamepadAxis::Rx, false),
        ("lt", GamepadAxis::Z, true),
        ("rt", GamepadAxis::Z, false),
    ];
    TAP_NAMES
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, axis, positive)| (axis, positive))
}
