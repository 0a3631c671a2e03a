//! Exact device descriptors used as broadcast binding keys.
//!
//! ## Descriptor grammar
//!
//! ```text
//! ctrl+shift+a            key press with modifiers
//! alt-f4 release          key release ('+' and '-' both separate)
//! pad 3                   gamepad button 3 press
//! pad start release       named gamepad button release
//! pad X+                  axis tap, positive direction
//! ```
//!
//! Names are matched case-insensitively.

use std::fmt;
use std::str::FromStr;

use super::keys::{axis_tap_by_name, gamepad_button_by_name, modifier_by_name, GamepadAxis, KeyCode};
use crate::error::{SceneError, SceneResult};

const GAMEPAD_PREFIX: &str = "pad";
const RELEASE: &str = "release";

/// Device class of a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Keyboard key.
    Key,
    /// Gamepad button.
    Gamepad,
    /// Gamepad axis tap.
    GamepadAxis,
}

/// An exact (kind, modifier mask, code, flag) descriptor.
///
/// For keys and gamepad buttons the flag means "release"; for axis taps it
/// is the tap direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    kind: InputKind,
    mask: u32,
    code: u32,
    flag: bool,
}

impl KeyStroke {
    /// Keyboard stroke.
    #[must_use]
    pub const fn key(mask: u32, code: KeyCode, release: bool) -> Self {
        Self {
            kind: InputKind::Key,
            mask,
            code: code.0,
            flag: release,
        }
    }

    /// Gamepad button stroke.
    #[must_use]
    pub const fn gamepad(mask: u32, button: u32, release: bool) -> Self {
        Self {
            kind: InputKind::Gamepad,
            mask,
            code: button,
            flag: release,
        }
    }

    /// Gamepad axis tap stroke. Taps never carry modifiers.
    #[must_use]
    pub const fn gamepad_tap(axis: GamepadAxis, positive: bool) -> Self {
        Self {
            kind: InputKind::GamepadAxis,
            mask: 0,
            code: axis.code(),
            flag: positive,
        }
    }

    /// Parses a descriptor such as `"ctrl+a release"` or `"pad X+"`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidKeyStroke`] for empty input, unknown
    /// key, modifier or button names, and trailing tokens other than
    /// `release`.
    pub fn parse(descriptor: &str) -> SceneResult<Self> {
        let tokens: Vec<&str> = descriptor.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err(invalid(descriptor, "empty descriptor")),
            [prefix, name, rest @ ..] if prefix.eq_ignore_ascii_case(GAMEPAD_PREFIX) => {
                if let Some((axis, positive)) = axis_tap_by_name(name) {
                    if !rest.is_empty() {
                        return Err(invalid(descriptor, "axis taps take no trailing tokens"));
                    }
                    return Ok(Self::gamepad_tap(axis, positive));
                }
                let button = gamepad_button_by_name(name)
                    .ok_or_else(|| invalid(descriptor, &format!("unknown gamepad button \"{name}\"")))?;
                Ok(Self::gamepad(0, button, parse_release(descriptor, rest)?))
            }
            [key, rest @ ..] => {
                let (mask, code) = parse_key(descriptor, key)?;
                Ok(Self::key(mask, code, parse_release(descriptor, rest)?))
            }
        }
    }

    /// Device class.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        self.kind
    }

    /// Modifier mask.
    #[must_use]
    pub const fn mask(&self) -> u32 {
        self.mask
    }

    /// Key code, button index or axis code.
    #[must_use]
    pub const fn code(&self) -> u32 {
        self.code
    }

    /// True for release strokes (keys, buttons).
    #[must_use]
    pub const fn is_release(&self) -> bool {
        self.flag && !matches!(self.kind, InputKind::GamepadAxis)
    }
}

impl FromStr for KeyStroke {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            InputKind::Key => write!(f, "key {} mask {:#x}", self.code, self.mask)?,
            InputKind::Gamepad => write!(f, "pad {} mask {:#x}", self.code, self.mask)?,
            InputKind::GamepadAxis => {
                return write!(f, "pad axis {}{}", self.code, if self.flag { '+' } else { '-' });
            }
        }
        if self.flag {
            f.write_str(" release")?;
        }
        Ok(())
    }
}

fn parse_key(descriptor: &str, token: &str) -> SceneResult<(u32, KeyCode)> {
    let parts: Vec<&str> = token.split(['+', '-']).collect();
    let (key, modifiers) = parts
        .split_last()
        .ok_or_else(|| invalid(descriptor, "missing key"))?;

    let mut mask = 0;
    for name in modifiers {
        mask |= modifier_by_name(name)
            .ok_or_else(|| invalid(descriptor, &format!("unknown modifier \"{name}\"")))?;
    }
    let code = KeyCode::from_name(key)
        .ok_or_else(|| invalid(descriptor, &format!("unknown key \"{key}\"")))?;
    Ok((mask, code))
}

fn parse_release(descriptor: &str, rest: &[&str]) -> SceneResult<bool> {
    match rest {
        [] => Ok(false),
        [token] if token.eq_ignore_ascii_case(RELEASE) => Ok(true),
        _ => Err(invalid(descriptor, "expected \"release\"")),
    }
}

fn invalid(descriptor: &str, reason: &str) -> SceneError {
    SceneError::InvalidKeyStroke(format!("{reason} in \"{descriptor}\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn test_parse_plain_key() {
        let ks = KeyStroke::parse("a").unwrap();
        assert_eq!(ks, KeyStroke::key(0, KeyCode::A, false));
        assert!(!ks.is_release());
    }

    #[test]
    fn test_parse_modifiers_and_release() {
        let ks: KeyStroke = "Ctrl+Shift+A release".parse().unwrap();
        assert_eq!(ks, KeyStroke::key(Modifiers::CTRL | Modifiers::SHIFT, KeyCode::A, true));
        assert!(ks.is_release());

        let dash = KeyStroke::parse("alt-f4").unwrap();
        assert_eq!(dash, KeyStroke::key(Modifiers::ALT, KeyCode::F4, false));
    }

    #[test]
    fn test_parse_gamepad() {
        assert_eq!(KeyStroke::parse("pad 3").unwrap(), KeyStroke::gamepad(0, 3, false));
        assert_eq!(KeyStroke::parse("PAD start release").unwrap(), KeyStroke::gamepad(0, 7, true));
        assert_eq!(
            KeyStroke::parse("pad X+").unwrap(),
            KeyStroke::gamepad_tap(GamepadAxis::X, true)
        );
        assert_eq!(
            KeyStroke::parse("pad ry-").unwrap(),
            KeyStroke::gamepad_tap(GamepadAxis::Ry, false)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(KeyStroke::parse("").is_err());
        assert!(KeyStroke::parse("   ").is_err());
        assert!(KeyStroke::parse("hyper+a").is_err());
        assert!(KeyStroke::parse("ctrl+").is_err());
        assert!(KeyStroke::parse("a later").is_err());
        assert!(KeyStroke::parse("pad nothing").is_err());
        assert!(KeyStroke::parse("pad X+ release").is_err());
    }

    #[test]
    fn test_kind_distinguishes_equal_codes() {
        assert_ne!(KeyStroke::key(0, KeyCode(3), false), KeyStroke::gamepad(0, 3, false));
    }
}
