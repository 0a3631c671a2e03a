//! Colors, themes and skin handles.
//!
//! Skins and fonts are opaque handles owned by the renderer; the scene only
//! resolves which handle a node should be drawn with.

use std::collections::HashMap;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from a packed 0xRRGGBBAA value.
    #[must_use]
    pub fn hex(hex: u32) -> Self {
        let channel = |shift: u32| f32::from(((hex >> shift) & 0xFF) as u8) / 255.0;
        Self::rgba(channel(24), channel(16), channel(8), channel(0))
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Multiplies the RGB channels by another color's, keeping this alpha.
    #[must_use]
    pub fn modulate_rgb(self, other: Self) -> Self {
        Self::rgba(self.r * other.r, self.g * other.g, self.b * other.b, self.a)
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Handle to a renderer-owned skin (a stack of textured draw steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkinId(pub u32);

/// Handle to a renderer-owned font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// How a node's skin texture coordinates scale with its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// No scaling.
    #[default]
    Normal,
    /// Scale along the longer axis by the aspect ratio.
    Aspect,
    /// Scale S by width / height.
    AdjustX,
    /// Scale T by height / width.
    AdjustY,
}

impl ScaleMode {
    /// Returns the (s, t) texture scale for a node of the given size.
    #[must_use]
    pub fn skin_scale(self, width: f32, height: f32) -> (f32, f32) {
        match self {
            Self::Normal => (1.0, 1.0),
            Self::Aspect => {
                let s = if width > height {
                    width / if height == 0.0 { 1.0 } else { height }
                } else {
                    1.0
                };
                let t = if height > width {
                    height / if width == 0.0 { 1.0 } else { width }
                } else {
                    1.0
                };
                (s, t)
            }
            Self::AdjustX => (if height == 0.0 { 0.0 } else { width / height }, 1.0),
            Self::AdjustY => (1.0, if width == 0.0 { 0.0 } else { height / width }),
        }
    }
}

/// Named skins and fonts, looked up by a widget's theme key.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    name: String,
    skins: HashMap<String, SkinId>,
    fonts: HashMap<String, FontId>,
}

impl Theme {
    /// Creates an empty theme.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skins: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    /// Theme name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets or clears the skin for a key.
    pub fn set_skin(&mut self, key: impl Into<String>, skin: Option<SkinId>) {
        let key = key.into();
        match skin {
            Some(skin) => {
                self.skins.insert(key, skin);
            }
            None => {
                self.skins.remove(&key);
            }
        }
    }

    /// Sets or clears the font for a key.
    pub fn set_font(&mut self, key: impl Into<String>, font: Option<FontId>) {
        let key = key.into();
        match font {
            Some(font) => {
                self.fonts.insert(key, font);
            }
            None => {
                self.fonts.remove(&key);
            }
        }
    }

    /// Builder form of [`Theme::set_skin`].
    #[must_use]
    pub fn with_skin(mut self, key: impl Into<String>, skin: SkinId) -> Self {
        self.set_skin(key, Some(skin));
        self
    }

    /// Skin registered for `key`.
    #[must_use]
    pub fn skin(&self, key: &str) -> Option<SkinId> {
        self.skins.get(key).copied()
    }

    /// Font registered for `key`.
    #[must_use]
    pub fn font(&self, key: &str) -> Option<FontId> {
        self.fonts.get(key).copied()
    }
}
