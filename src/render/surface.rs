use image::{RgbaImage, imageops::FilterType};

use crate::{
    assets::decode::Raster,
    foundation::{
        core::{OutputSize, Placement, round_half_up},
        error::{TintmarkError, TintmarkResult},
    },
    render::blend::{PremulRgba8, over, unpremultiply},
};

/// Mutable premultiplied RGBA8 canvas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(size: OutputSize) -> Self {
        let mut s = Self::default();
        s.resize(size);
        s
    }

    pub fn size(&self) -> OutputSize {
        OutputSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reassign dimensions. Like resizing an HTML canvas, this always clears.
    pub fn resize(&mut self, size: OutputSize) {
        self.width = size.width;
        self.height = size.height;
        self.data.clear();
        self.data.resize(size.rgba_len(), 0);
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Composite a uniform color over every pixel.
    pub fn fill_over(&mut self, color: PremulRgba8, opacity: f32) {
        for d in self.data.chunks_exact_mut(4) {
            let out = over([d[0], d[1], d[2], d[3]], color, opacity);
            d.copy_from_slice(&out);
        }
    }

    /// Resample `raster` into `at` and composite it, clipped to the canvas.
    ///
    /// Only the part of the source that lands on the canvas is resampled, so heavily cropped
    /// draws stay proportional to the canvas rather than to the scaled image.
    pub fn draw_raster(&mut self, raster: &Raster, at: Placement) -> TintmarkResult<()> {
        let (cw, ch) = (i64::from(self.width), i64::from(self.height));
        let vis_x0 = at.x.max(0);
        let vis_y0 = at.y.max(0);
        let vis_x1 = at.right().min(cw);
        let vis_y1 = at.bottom().min(ch);
        if vis_x0 >= vis_x1 || vis_y0 >= vis_y1 {
            return Ok(());
        }

        // Source pixels per destination pixel.
        let sx = f64::from(raster.width()) / f64::from(at.width);
        let sy = f64::from(raster.height()) / f64::from(at.height);

        // Visible source window plus one pixel of filter margin, clamped to the image.
        let window = |v0: i64, v1: i64, origin: i64, s: f64, len: u32| -> (u32, u32) {
            let a = (((v0 - origin) as f64 * s).floor() as i64 - 1).max(0);
            let b = (((v1 - origin) as f64 * s).ceil() as i64 + 1).min(i64::from(len));
            (a as u32, b as u32)
        };
        let (src_x0, src_x1) = window(vis_x0, vis_x1, at.x, sx, raster.width());
        let (src_y0, src_y1) = window(vis_y0, vis_y1, at.y, sy, raster.height());
        if src_x0 >= src_x1 || src_y0 >= src_y1 {
            return Ok(());
        }

        // Where that window lands on the canvas.
        let dst_x0 = at.x + round_half_up(f64::from(src_x0) / sx) as i64;
        let dst_y0 = at.y + round_half_up(f64::from(src_y0) / sy) as i64;
        let dst_x1 = at.x + round_half_up(f64::from(src_x1) / sx) as i64;
        let dst_y1 = at.y + round_half_up(f64::from(src_y1) / sy) as i64;
        let dst_w = (dst_x1 - dst_x0).max(1) as u32;
        let dst_h = (dst_y1 - dst_y0).max(1) as u32;

        let (win_w, win_h) = (src_x1 - src_x0, src_y1 - src_y0);
        let stride = (raster.width() as usize) * 4;
        let row_len = (win_w as usize) * 4;
        let src = raster.rgba8_premul();
        let mut window_px = Vec::with_capacity(row_len * (win_h as usize));
        for y in src_y0..src_y1 {
            let start = (y as usize) * stride + (src_x0 as usize) * 4;
            window_px.extend_from_slice(&src[start..start + row_len]);
        }
        let cropped = RgbaImage::from_raw(win_w, win_h, window_px)
            .ok_or_else(|| TintmarkError::validation("raster buffer does not match its size"))?;

        let scaled = if cropped.dimensions() == (dst_w, dst_h) {
            cropped
        } else {
            image::imageops::resize(&cropped, dst_w, dst_h, FilterType::Triangle)
        };

        self.blit_over(&scaled, dst_x0, dst_y0);
        Ok(())
    }

    fn blit_over(&mut self, src: &RgbaImage, x0: i64, y0: i64) {
        let (cw, ch) = (i64::from(self.width), i64::from(self.height));
        let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

        let cx0 = x0.max(0);
        let cy0 = y0.max(0);
        let cx1 = (x0 + sw).min(cw);
        let cy1 = (y0 + sh).min(ch);
        if cx0 >= cx1 || cy0 >= cy1 {
            return;
        }

        let src_raw = src.as_raw();
        for y in cy0..cy1 {
            let sy = (y - y0) as usize;
            let row_dst = (y as usize) * (self.width as usize);
            for x in cx0..cx1 {
                let sx = (x - x0) as usize;
                let si = (sy * (sw as usize) + sx) * 4;
                let di = (row_dst + x as usize) * 4;
                let s = &src_raw[si..si + 4];
                let d = &mut self.data[di..di + 4];
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Straight-alpha copy for encoding.
    pub fn to_rgba_image(&self) -> TintmarkResult<RgbaImage> {
        let mut straight = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            straight.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| TintmarkError::export("surface buffer does not match its size"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::AspectRatio;

    fn tiny(width: u32, height: u32) -> Surface {
        Surface::new(OutputSize { width, height })
    }

    #[test]
    fn resize_clears_previous_content() {
        let mut s = tiny(4, 4);
        s.fill_over([255, 255, 255, 255], 1.0);
        s.resize(OutputSize {
            width: 4,
            height: 4,
        });
        assert!(s.data().iter().all(|&b| b == 0));

        s.resize(AspectRatio::Square.output_size());
        assert_eq!(s.data().len(), 720 * 720 * 4);
    }

    #[test]
    fn draw_same_size_copies_pixels() {
        let mut s = tiny(4, 4);
        let r = Raster::solid(2, 2, [10, 20, 30, 255]).unwrap();
        s.draw_raster(&r, Placement::new(1, 1, 2, 2).unwrap()).unwrap();
        assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(s.pixel(1, 1), Some([10, 20, 30, 255]));
        assert_eq!(s.pixel(2, 2), Some([10, 20, 30, 255]));
        assert_eq!(s.pixel(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn draw_clips_negative_and_overflowing_placements() {
        let mut s = tiny(4, 4);
        let r = Raster::solid(3, 3, [200, 0, 0, 255]).unwrap();
        s.draw_raster(&r, Placement::new(-2, 3, 6, 6).unwrap()).unwrap();
        assert_eq!(s.pixel(0, 3), Some([200, 0, 0, 255]));
        assert_eq!(s.pixel(3, 3), Some([200, 0, 0, 255]));
        assert_eq!(s.pixel(0, 2), Some([0, 0, 0, 0]));

        // Entirely off-canvas draws are no-ops.
        s.draw_raster(&r, Placement::new(10, 10, 3, 3).unwrap()).unwrap();
    }

    #[test]
    fn upscaled_solid_fills_target_rect() {
        let mut s = tiny(8, 8);
        let r = Raster::solid(1, 1, [0, 255, 0, 255]).unwrap();
        s.draw_raster(&r, Placement::new(0, 0, 8, 8).unwrap()).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(s.pixel(x, y), Some([0, 255, 0, 255]));
            }
        }
    }

    #[test]
    fn extreme_crop_only_resamples_the_visible_window() {
        let mut s = Surface::new(AspectRatio::Ultrawide.output_size());
        let r = Raster::solid(3, 1000, [1, 2, 3, 255]).unwrap();
        // 3x1000 cover-fit into 1680x720 scales by 560.
        let p = crate::render::geometry::cover_fit(3, 1000, s.size());
        s.draw_raster(&r, p).unwrap();
        assert_eq!(s.pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(s.pixel(1679, 719), Some([1, 2, 3, 255]));
    }

    #[test]
    fn to_rgba_image_unpremultiplies() {
        let mut s = tiny(1, 1);
        s.fill_over([255, 0, 0, 255], 0.5);
        let img = s.to_rgba_image().unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 128]);
    }
}
