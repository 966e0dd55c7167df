use std::{fmt, str::FromStr};

use crate::foundation::error::{TintmarkError, TintmarkResult};

/// Fixed output height in pixels. Width follows from the selected [`AspectRatio`].
pub const OUTPUT_HEIGHT: u32 = 720;

/// Output aspect ratio, one of a fixed set.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum AspectRatio {
    /// `1:1`
    Square,
    /// `4:3`
    Standard,
    /// `16:9`
    #[default]
    Widescreen,
    /// `21:9`
    Ultrawide,
}

impl AspectRatio {
    /// Every selectable ratio, in menu order.
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Square,
        AspectRatio::Standard,
        AspectRatio::Widescreen,
        AspectRatio::Ultrawide,
    ];

    /// Key as shown in the ratio picker, e.g. `"16:9"`.
    pub fn key(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Ultrawide => "21:9",
        }
    }

    /// `(rw, rh)` numerator and denominator.
    pub fn parts(self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1, 1),
            AspectRatio::Standard => (4, 3),
            AspectRatio::Widescreen => (16, 9),
            AspectRatio::Ultrawide => (21, 9),
        }
    }

    /// Parse a ratio key, falling back to the default (`16:9`) for anything unknown.
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            tracing::warn!(key, "unknown aspect ratio, using default");
            Self::default()
        })
    }

    /// Pixel size of the output canvas for this ratio.
    pub fn output_size(self) -> OutputSize {
        OutputSize::for_ratio(self)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AspectRatio {
    type Err = TintmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.key() == s)
            .ok_or_else(|| {
                TintmarkError::validation(format!(
                    "unknown aspect ratio \"{s}\" (expected one of 1:1, 4:3, 16:9, 21:9)"
                ))
            })
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = TintmarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.key().to_owned()
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutputSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl OutputSize {
    /// `height = 720`, `width = round(720 * rw / rh)`.
    pub fn for_ratio(ratio: AspectRatio) -> Self {
        let (rw, rh) = ratio.parts();
        let width = round_half_up(f64::from(OUTPUT_HEIGHT) * f64::from(rw) / f64::from(rh));
        Self {
            width: width as u32,
            height: OUTPUT_HEIGHT,
        }
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Integer destination rectangle on the canvas. The origin may be negative (cropped draws).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> TintmarkResult<Self> {
        if width == 0 || height == 0 {
            return Err(TintmarkError::validation(
                "placement width and height must be > 0",
            ));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        self.x + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        self.y + i64::from(self.height)
    }

    /// Return `true` when the placement covers `(0,0)-(width,height)` completely.
    pub fn covers(self, size: OutputSize) -> bool {
        self.x <= 0
            && self.y <= 0
            && self.right() >= i64::from(size.width)
            && self.bottom() >= i64::from(size.height)
    }
}

/// Round to nearest with ties toward positive infinity, the way canvas scripts round
/// (`Math.round`). `f64::round` sends `-0.5` to `-1`; this sends it to `0`.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_sizes_for_every_ratio() {
        let widths: Vec<u32> = AspectRatio::ALL
            .iter()
            .map(|r| r.output_size().width)
            .collect();
        assert_eq!(widths, vec![720, 960, 1280, 1680]);
        assert!(
            AspectRatio::ALL
                .iter()
                .all(|r| r.output_size().height == OUTPUT_HEIGHT)
        );
    }

    #[test]
    fn ratio_keys_round_trip_through_from_str() {
        for r in AspectRatio::ALL {
            assert_eq!(r.key().parse::<AspectRatio>().unwrap(), r);
        }
        assert!("3:2".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn unknown_ratio_falls_back_to_widescreen() {
        assert_eq!(AspectRatio::from_key_or_default("nope"), AspectRatio::Widescreen);
        assert_eq!(AspectRatio::from_key_or_default(" 4:3 "), AspectRatio::Standard);
    }

    #[test]
    fn ratio_serde_uses_key_strings() {
        let json = serde_json::to_string(&AspectRatio::Ultrawide).unwrap();
        assert_eq!(json, "\"21:9\"");
        let r: AspectRatio = serde_json::from_str("\"1:1\"").unwrap();
        assert_eq!(r, AspectRatio::Square);
        assert!(serde_json::from_str::<AspectRatio>("\"2:1\"").is_err());
    }

    #[test]
    fn round_half_up_matches_canvas_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(-1.6), -2.0);
    }

    #[test]
    fn placement_rejects_empty_and_reports_coverage() {
        assert!(Placement::new(0, 0, 0, 10).is_err());
        let size = AspectRatio::Square.output_size();
        let p = Placement::new(-10, 0, 740, 720).unwrap();
        assert!(p.covers(size));
        let p = Placement::new(1, 0, 740, 720).unwrap();
        assert!(!p.covers(size));
    }
}
