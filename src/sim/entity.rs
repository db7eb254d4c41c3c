//! Shared geometry and render primitives
//!
//! Plain data only. Every engine keeps flat `Vec`s of these and attaches its
//! own meaning (enemy row, bullet owner) in wrapper structs where needed.

use std::borrow::Cow;

/// Integer grid or screen coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by a (dx, dy) offset
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// True if inside `[0, width) x [0, height)`
    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width && self.y < height
    }
}

/// Semantic color, mapped to real terminal colors by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorTag {
    #[default]
    White,
    Green,
    Yellow,
    Red,
    Cyan,
    Magenta,
    Blue,
    Gray,
}

/// A renderable thing: position, glyph (possibly several cells wide), color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub pos: Position,
    pub glyph: Cow<'static, str>,
    pub color: ColorTag,
}

impl Entity {
    pub fn new(pos: Position, glyph: impl Into<Cow<'static, str>>, color: ColorTag) -> Self {
        Self {
            pos,
            glyph: glyph.into(),
            color,
        }
    }

    /// Number of cells the glyph covers horizontally
    pub fn width(&self) -> i32 {
        self.glyph.chars().count() as i32
    }

    /// True if `x` falls inside the glyph's horizontal span
    pub fn covers_x(&self, x: i32) -> bool {
        x >= self.pos.x && x < self.pos.x + self.width()
    }
}
