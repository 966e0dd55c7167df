use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::error::TintmarkError;

/// Opacity of the color layer laid over the background.
pub const OVERLAY_ALPHA: f32 = 0.5;

/// 24-bit overlay color picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// Color picker default, `#ff0000`.
    pub const DEFAULT_OVERLAY: Rgb8 = Rgb8 { r: 255, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the `#` is optional, case-insensitive).
    pub fn parse_hex(s: &str) -> Result<Self, TintmarkError> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, TintmarkError> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| TintmarkError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TintmarkError::validation(
                "overlay color must be #RRGGBB (case-insensitive)",
            ));
        }
        Ok(Self {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS form, e.g. `rgba(255, 0, 0, 0.5)`.
    pub fn to_rgba_css(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Opaque premultiplied RGBA8; the overlay alpha is applied at blend time.
    pub fn to_rgba8_premul(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Self::DEFAULT_OVERLAY
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb8 {
    type Err = TintmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}
