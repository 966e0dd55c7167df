use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::OutputSize,
        error::{TintmarkError, TintmarkResult},
    },
    render::surface::Surface,
};

/// An encoded composition ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedPng {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedPng {
    /// Write into `dir` (created if missing) and return the full path.
    pub fn write_to_dir(&self, dir: &Path) -> TintmarkResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(path)
    }
}

/// `composed-<width>x<height>.png`
pub fn export_file_name(size: OutputSize) -> String {
    format!("composed-{}x{}.png", size.width, size.height)
}

pub fn encode_png(surface: &Surface) -> TintmarkResult<ExportedPng> {
    let img = surface.to_rgba_image()?;
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| TintmarkError::export(format!("encode png: {e}")))?;
    Ok(ExportedPng {
        file_name: export_file_name(surface.size()),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::AspectRatio;

    #[test]
    fn file_name_carries_dimensions() {
        assert_eq!(
            export_file_name(AspectRatio::Ultrawide.output_size()),
            "composed-1680x720.png"
        );
    }

    #[test]
    fn encoded_png_decodes_to_same_size() {
        let mut s = Surface::new(OutputSize {
            width: 3,
            height: 2,
        });
        s.fill_over([0, 255, 0, 255], 1.0);
        let png = encode_png(&s).unwrap();
        assert_eq!(png.file_name, "composed-3x2.png");

        let back = image::load_from_memory(&png.bytes).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1).0, [0, 255, 0, 255]);
    }
}
