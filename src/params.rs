//! Everything a render depends on, as one immutable value.

use crate::{
    assets::{color::Rgb8, decode::Raster},
    foundation::core::AspectRatio,
};

pub const DEFAULT_PADDING_PX: u32 = 24;
pub const DEFAULT_LOGO_WIDTH_PCT: u32 = 20;

/// The current background: either a gallery pick or an uploaded file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Background {
    Gallery { name: String, image: Raster },
    Uploaded { name: String, image: Raster },
}

impl Background {
    pub fn image(&self) -> &Raster {
        match self {
            Background::Gallery { image, .. } | Background::Uploaded { image, .. } => image,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Background::Gallery { name, .. } | Background::Uploaded { name, .. } => name,
        }
    }

    /// Gallery entry name, `None` for uploads.
    pub fn gallery_name(&self) -> Option<&str> {
        match self {
            Background::Gallery { name, .. } => Some(name),
            Background::Uploaded { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Logo {
    pub name: String,
    pub image: Raster,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderParams {
    pub background: Option<Background>,
    pub overlay: Rgb8,
    pub logo: Option<Logo>,
    /// Offset of the logo from the top and right edges.
    pub padding_px: u32,
    /// Logo target width as a percentage of canvas width.
    pub logo_width_pct: u32,
    pub ratio: AspectRatio,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            background: None,
            overlay: Rgb8::DEFAULT_OVERLAY,
            logo: None,
            padding_px: DEFAULT_PADDING_PX,
            logo_width_pct: DEFAULT_LOGO_WIDTH_PCT,
            ratio: AspectRatio::default(),
        }
    }
}

impl RenderParams {
    pub fn with_background(mut self, background: Option<Background>) -> Self {
        self.background = background;
        self
    }

    pub fn with_logo(mut self, logo: Option<Logo>) -> Self {
        self.logo = logo;
        self
    }

    pub fn with_overlay(mut self, overlay: Rgb8) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_padding(mut self, padding_px: u32) -> Self {
        self.padding_px = padding_px;
        self
    }

    /// Zero is not a usable width; it falls back to the default.
    pub fn with_logo_width_pct(mut self, pct: u32) -> Self {
        self.logo_width_pct = if pct == 0 { DEFAULT_LOGO_WIDTH_PCT } else { pct };
        self
    }

    pub fn with_ratio(mut self, ratio: AspectRatio) -> Self {
        self.ratio = ratio;
        self
    }

    /// Export needs both a background and a logo.
    pub fn is_exportable(&self) -> bool {
        self.background.is_some() && self.logo.is_some()
    }
}

/// Padding as typed into the form: a non-negative integer, anything else means 24.
pub fn parse_padding(input: &str) -> u32 {
    match parse_leading_int(input) {
        Some(v) if v >= 0 => u32::try_from(v).unwrap_or(DEFAULT_PADDING_PX),
        _ => DEFAULT_PADDING_PX,
    }
}

/// Logo width percentage as typed: a positive integer, anything else means 20.
pub fn parse_logo_width_pct(input: &str) -> u32 {
    match parse_leading_int(input) {
        Some(v) if v > 0 => u32::try_from(v).unwrap_or(DEFAULT_LOGO_WIDTH_PCT),
        _ => DEFAULT_LOGO_WIDTH_PCT,
    }
}

// Integer prefix of `s` after leading whitespace: `"12px"` is 12, `"px"` is nothing.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let v: i64 = rest[..digits].parse().ok()?;
    Some(if neg { -v } else { v })
}
