//! Color values and merge-field color indirection.
//!
//! `Color` is a plain RGBA value with hex formatting. `ColorNode` is what
//! label objects actually store: either a literal color or the name of a
//! merge field whose per-record value is parsed as a color when the node is
//! resolved against a record.

use serde::{Deserialize, Serialize};

use crate::merge::MergeRecord;

/// An RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque color from red/green/blue.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from red/green/blue/alpha.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black, the fallback for unresolvable color fields.
    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse a color string (named or `#rrggbb`/`#rrggbbaa` hex).
pub fn parse_color(val: &str) -> Option<Color> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix('#') {
        // Parse #rrggbb or #rrggbbaa hex notation
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }
        // The pair slices below require every byte to be an ASCII hex digit.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let r = channel(0)?;
        let g = channel(2)?;
        let b = channel(4)?;
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Color::rgba(r, g, b, a))
    } else {
        // Accept common named colors
        match val.to_ascii_lowercase().as_str() {
            "white" => Some(Color::rgb(255, 255, 255)),
            "black" => Some(Color::rgb(0, 0, 0)),
            "red" => Some(Color::rgb(255, 0, 0)),
            "green" => Some(Color::rgb(0, 255, 0)),
            "blue" => Some(Color::rgb(0, 0, 255)),
            "yellow" => Some(Color::rgb(255, 255, 0)),
            "orange" => Some(Color::rgb(255, 165, 0)),
            "cyan" => Some(Color::rgb(0, 255, 255)),
            "magenta" => Some(Color::rgb(255, 0, 255)),
            "gray" | "grey" => Some(Color::rgb(128, 128, 128)),
            "brown" => Some(Color::rgb(165, 42, 42)),
            "purple" => Some(Color::rgb(128, 0, 128)),
            "pink" => Some(Color::rgb(255, 192, 203)),
            "navy" => Some(Color::rgb(0, 0, 128)),
            "teal" => Some(Color::rgb(0, 128, 128)),
            "maroon" => Some(Color::rgb(128, 0, 0)),
            "silver" => Some(Color::rgb(192, 192, 192)),
            _ => None,
        }
    }
}

/// A color that is either a literal or a reference to a merge field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorNode {
    /// When true, `key` names the merge field supplying the color.
    pub field_flag: bool,
    /// Literal color, used when `field_flag` is false.
    pub color: Color,
    /// Merge field key, used when `field_flag` is true.
    pub key: String,
}

impl ColorNode {
    /// A literal color node.
    pub fn from_color(color: Color) -> Self {
        Self {
            field_flag: false,
            color,
            key: String::new(),
        }
    }

    /// A node drawing its color from the given merge field.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            field_flag: true,
            color: Color::black(),
            key: key.into(),
        }
    }

    /// Resolve to a concrete color against an optional merge record.
    ///
    /// Field nodes fall back to opaque black when no record is given, the
    /// key is absent, or the field value does not parse as a color.
    pub fn resolve(&self, record: Option<&MergeRecord>) -> Color {
        if !self.field_flag {
            return self.color;
        }
        record
            .and_then(|r| parse_color(r.value(&self.key)))
            .unwrap_or_else(Color::black)
    }
}

impl Default for ColorNode {
    fn default() -> Self {
        Self::from_color(Color::black())
    }
}
