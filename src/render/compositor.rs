use crate::{
    assets::color::OVERLAY_ALPHA,
    foundation::{core::OutputSize, error::TintmarkResult},
    params::RenderParams,
    render::{
        geometry::{cover_fit, logo_placement, output_size},
        surface::Surface,
    },
    status::Status,
};

/// What a render produced besides pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderReport {
    pub size: OutputSize,
    pub export_enabled: bool,
    pub status: Status,
}

/// Draw `params` into `surface`.
///
/// 1. resize (and so clear) the surface to the ratio's output size
/// 2. without a background, stop there
/// 3. cover-fit the background, cropping overflow evenly
/// 4. lay the overlay color over everything at 50%
/// 5. place the logo top-right, `padding_px` in from the edges, never upscaled
#[tracing::instrument(skip_all, fields(ratio = %params.ratio))]
pub fn compose(params: &RenderParams, surface: &mut Surface) -> TintmarkResult<RenderReport> {
    let size = output_size(params.ratio);
    surface.resize(size);

    let Some(background) = &params.background else {
        tracing::debug!("no background selected");
        return Ok(RenderReport {
            size,
            export_enabled: false,
            status: Status::NoBackground,
        });
    };

    let bg = background.image();
    let bg_at = cover_fit(bg.width(), bg.height(), size);
    surface.draw_raster(bg, bg_at)?;

    surface.fill_over(params.overlay.to_rgba8_premul(), OVERLAY_ALPHA);

    if let Some(logo) = &params.logo {
        let img = &logo.image;
        match logo_placement(
            img.width(),
            img.height(),
            size,
            params.logo_width_pct,
            params.padding_px,
        ) {
            Some(at) => surface.draw_raster(img, at)?,
            None => tracing::warn!(logo = %logo.name, "logo scales to zero pixels, skipped"),
        }
    }

    let export_enabled = params.is_exportable();
    let status = if export_enabled {
        Status::Ready
    } else {
        Status::LogoRequired
    };

    tracing::debug!(
        width = size.width,
        height = size.height,
        overlay = %params.overlay.to_rgba_css(OVERLAY_ALPHA),
        export_enabled,
        "composed"
    );

    Ok(RenderReport {
        size,
        export_enabled,
        status,
    })
}

/// Render into a fresh surface.
pub fn render(params: &RenderParams) -> TintmarkResult<(Surface, RenderReport)> {
    let mut surface = Surface::default();
    let report = compose(params, &mut surface)?;
    Ok((surface, report))
}
