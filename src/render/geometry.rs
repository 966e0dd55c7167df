//! Pure placement math for the compositor.
//!
//! All rounding goes through [`round_half_up`] so placements match what a browser canvas
//! produces for the same inputs.

use crate::foundation::core::{AspectRatio, OutputSize, Placement, round_half_up};

pub fn output_size(ratio: AspectRatio) -> OutputSize {
    OutputSize::for_ratio(ratio)
}

/// Scale-and-crop so a `bg_w x bg_h` image fills `out` with no letterboxing.
///
/// `scale = max(outW / bgW, outH / bgH)`, centred, overflow cropped evenly on both sides.
pub fn cover_fit(bg_w: u32, bg_h: u32, out: OutputSize) -> Placement {
    let bg_w = f64::from(bg_w.max(1));
    let bg_h = f64::from(bg_h.max(1));
    let out_w = f64::from(out.width);
    let out_h = f64::from(out.height);

    let scale = (out_w / bg_w).max(out_h / bg_h);
    let scaled_w = round_half_up(bg_w * scale);
    let scaled_h = round_half_up(bg_h * scale);
    if scaled_w > f64::from(u32::MAX) || scaled_h > f64::from(u32::MAX) {
        tracing::warn!(
            bg_w,
            bg_h,
            scaled_w,
            scaled_h,
            "background too elongated to cover-fit exactly; clamping its long side"
        );
    }
    // Float error can land a hair below the target; the result must still cover it.
    let draw_w = (scaled_w as u32).max(out.width);
    let draw_h = (scaled_h as u32).max(out.height);

    let dx = round_half_up((out_w - f64::from(draw_w)) / 2.0) as i64;
    let dy = round_half_up((out_h - f64::from(draw_h)) / 2.0) as i64;

    Placement {
        x: dx,
        y: dy,
        width: draw_w,
        height: draw_h,
    }
}

/// Target logo width: `round(outW * pct / 100)`.
pub fn max_logo_width(out: OutputSize, logo_width_pct: u32) -> u32 {
    round_half_up(f64::from(out.width) * f64::from(logo_width_pct) / 100.0) as u32
}

/// `min(max_w / logo_w, 1)`; logos smaller than the target are never enlarged.
pub fn logo_scale(logo_w: u32, max_w: u32) -> f64 {
    (f64::from(max_w) / f64::from(logo_w.max(1))).min(1.0)
}

/// Logo rectangle anchored top-right, `padding` px in from both edges it touches.
///
/// Returns `None` when the scaled logo rounds down to nothing.
pub fn logo_placement(
    logo_w: u32,
    logo_h: u32,
    out: OutputSize,
    logo_width_pct: u32,
    padding: u32,
) -> Option<Placement> {
    let scale = logo_scale(logo_w, max_logo_width(out, logo_width_pct));
    let w = round_half_up(f64::from(logo_w) * scale) as u32;
    let h = round_half_up(f64::from(logo_h) * scale) as u32;
    if w == 0 || h == 0 {
        return None;
    }
    Some(Placement {
        x: i64::from(out.width) - i64::from(w) - i64::from(padding),
        y: i64::from(padding),
        width: w,
        height: h,
    })
}
