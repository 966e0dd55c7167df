use std::sync::Arc;

use crate::foundation::error::{TintmarkError, TintmarkResult};

// Avoid pathological allocations from hostile or broken SVG headers.
const MAX_SVG_DIM: u32 = 16_384;

/// Immutable decoded image in premultiplied RGBA8 form, with its natural dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    /// Row-major premultiplied RGBA8, tightly packed.
    rgba8_premul: Arc<Vec<u8>>,
}

impl Raster {
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TintmarkResult<Self> {
        if width == 0 || height == 0 {
            return Err(TintmarkError::decode("image has zero width or height"));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8_premul.len() != expected {
            return Err(TintmarkError::decode(format!(
                "rgba buffer length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Uniform image, handy for placeholders and tests. `rgba` is straight alpha.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> TintmarkResult<Self> {
        let mut px = rgba;
        premultiply_rgba8_in_place(&mut px);
        let len = (width as usize) * (height as usize);
        Self::from_premul(width, height, px.repeat(len))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Decode any raster format the `image` crate recognises.
pub fn decode_image(bytes: &[u8]) -> TintmarkResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TintmarkError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Raster::from_premul(width, height, rgba8_premul)
}

/// Parse an SVG document and rasterize it at its intrinsic size.
pub fn decode_svg(bytes: &[u8]) -> TintmarkResult<Raster> {
    fn to_px(v: f32) -> TintmarkResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(TintmarkError::decode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| TintmarkError::decode(format!("parse svg tree: {e}")))?;

    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(TintmarkError::decode(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| TintmarkError::decode("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Raster::from_premul(width, height, pixmap.take())
}

/// Decode `bytes`, choosing the SVG path by file name or content sniffing.
pub fn decode_asset(bytes: &[u8], name_hint: &str) -> TintmarkResult<Raster> {
    if looks_like_svg(bytes, name_hint) {
        decode_svg(bytes)
    } else {
        decode_image(bytes)
    }
}

fn looks_like_svg(bytes: &[u8], name_hint: &str) -> bool {
    if name_hint.to_ascii_lowercase().ends_with(".svg") {
        return true;
    }
    let head = &bytes[..bytes.len().min(1024)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    (head.starts_with("<?xml") || head.starts_with("<svg")) && head.contains("<svg")
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
