//! UI-side state owner.
//!
//! A [`Session`] holds the current [`RenderParams`] and the canvas. Every mutation replaces the
//! params and then redraws exactly once; there is no other path to the compositor. Image loads
//! are split into `begin_*` (hands out a [`LoadTicket`]) and [`Session::finish`] so that decoding
//! can happen elsewhere, and a load that was overtaken by a newer one for the same slot is
//! discarded when it completes.

use std::path::{Path, PathBuf};

use crate::{
    assets::{
        color::Rgb8,
        gallery::Gallery,
        loader::{LoadOutcome, LoadTarget, LoadTicket, Loader, Slot},
        source::AssetSource,
    },
    export::{ExportedPng, encode_png},
    foundation::{
        core::AspectRatio,
        error::{TintmarkError, TintmarkResult},
    },
    params::{Background, Logo, RenderParams, parse_logo_width_pct, parse_padding},
    render::{
        compositor::{RenderReport, compose},
        surface::Surface,
    },
    status::Status,
};

const NO_LOGO_LABEL: &str = "No file selected";

/// A background pick from the form.
#[derive(Clone, Debug)]
pub enum BackgroundRequest {
    Gallery(String),
    Uploaded(AssetSource),
}

/// How a finished load was handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadResolution {
    /// The image replaced the slot and the canvas was redrawn.
    Applied,
    /// A newer request for the same slot exists; the result was dropped.
    Superseded,
    /// Decoding failed; params and canvas are unchanged, status reports the failure.
    Failed { reason: String },
}

impl LoadResolution {
    /// Turn anything but [`LoadResolution::Applied`] into an error naming `what` was loading.
    pub fn ensure_applied(self, what: &str) -> TintmarkResult<()> {
        match self {
            LoadResolution::Applied => Ok(()),
            LoadResolution::Superseded => Err(TintmarkError::validation(format!(
                "{what} load was superseded"
            ))),
            LoadResolution::Failed { reason } => {
                Err(TintmarkError::decode(format!("{what}: {reason}")))
            }
        }
    }
}

pub struct Session {
    params: RenderParams,
    gallery: Gallery,
    surface: Surface,
    report: RenderReport,
    status: Status,
    background_generation: u64,
    logo_generation: u64,
}

impl Session {
    pub fn new(gallery: Gallery) -> TintmarkResult<Self> {
        let mut surface = Surface::default();
        let params = RenderParams::default();
        let report = compose(&params, &mut surface)?;
        Ok(Self {
            params,
            gallery,
            surface,
            report,
            status: report.status,
            background_generation: 0,
            logo_generation: 0,
        })
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn report(&self) -> RenderReport {
        self.report
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn export_enabled(&self) -> bool {
        self.report.export_enabled
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Gallery entry to highlight, if the current background came from the gallery.
    pub fn active_gallery(&self) -> Option<&str> {
        self.params.background.as_ref().and_then(Background::gallery_name)
    }

    pub fn logo_label(&self) -> &str {
        self.params
            .logo
            .as_ref()
            .map_or(NO_LOGO_LABEL, |l| l.name.as_str())
    }

    fn redraw(&mut self) -> TintmarkResult<RenderReport> {
        let report = compose(&self.params, &mut self.surface)?;
        self.report = report;
        self.status = report.status;
        Ok(report)
    }

    /// Surface a status that did not come from a render. The canvas is left as drawn.
    fn set_status(&mut self, status: Status) {
        self.status = status;
        self.report.status = status;
    }

    fn update(
        &mut self,
        f: impl FnOnce(RenderParams) -> RenderParams,
    ) -> TintmarkResult<RenderReport> {
        let params = std::mem::take(&mut self.params);
        self.params = f(params);
        self.redraw()
    }

    pub fn set_overlay(&mut self, color: Rgb8) -> TintmarkResult<RenderReport> {
        self.update(|p| p.with_overlay(color))
    }

    /// Color picker input, `#RRGGBB`.
    pub fn set_color(&mut self, hex: &str) -> TintmarkResult<RenderReport> {
        let color = Rgb8::parse_hex(hex)?;
        self.set_overlay(color)
    }

    pub fn set_padding_px(&mut self, padding_px: u32) -> TintmarkResult<RenderReport> {
        self.update(|p| p.with_padding(padding_px))
    }

    /// Padding as typed; invalid input means the default.
    pub fn set_padding(&mut self, input: &str) -> TintmarkResult<RenderReport> {
        self.set_padding_px(parse_padding(input))
    }

    pub fn set_logo_width_pct(&mut self, pct: u32) -> TintmarkResult<RenderReport> {
        self.update(|p| p.with_logo_width_pct(pct))
    }

    /// Logo size as typed; invalid input means the default.
    pub fn set_logo_width(&mut self, input: &str) -> TintmarkResult<RenderReport> {
        self.set_logo_width_pct(parse_logo_width_pct(input))
    }

    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) -> TintmarkResult<RenderReport> {
        self.update(|p| p.with_ratio(ratio))
    }

    /// Ratio key from the picker; unknown keys mean `16:9`.
    pub fn set_ratio(&mut self, key: &str) -> TintmarkResult<RenderReport> {
        self.set_aspect_ratio(AspectRatio::from_key_or_default(key))
    }

    /// Drop the logo. Any logo load still in flight is invalidated.
    pub fn clear_logo(&mut self) -> TintmarkResult<RenderReport> {
        self.logo_generation += 1;
        self.update(|p| p.with_logo(None))
    }

    /// Back to defaults, invalidating every in-flight load.
    pub fn reset(&mut self) -> TintmarkResult<RenderReport> {
        self.background_generation += 1;
        self.logo_generation += 1;
        self.update(|_| RenderParams::default())
    }

    /// Start a background load. The returned source is what must be decoded for the ticket.
    pub fn begin_background(
        &mut self,
        request: BackgroundRequest,
    ) -> TintmarkResult<(LoadTicket, AssetSource)> {
        let (target, source) = match request {
            BackgroundRequest::Gallery(name) => {
                let path = self.gallery.resolve(&name).ok_or_else(|| {
                    TintmarkError::validation(format!("unknown gallery entry \"{name}\""))
                })?;
                let source = AssetSource::Path(path.to_path_buf());
                (LoadTarget::GalleryBackground { name }, source)
            }
            BackgroundRequest::Uploaded(source) => (
                LoadTarget::UploadedBackground {
                    name: source.name(),
                },
                source,
            ),
        };
        self.background_generation += 1;
        let ticket = LoadTicket {
            target,
            generation: self.background_generation,
        };
        Ok((ticket, source))
    }

    pub fn begin_logo(&mut self, source: &AssetSource) -> LoadTicket {
        self.logo_generation += 1;
        LoadTicket {
            target: LoadTarget::Logo {
                name: source.name(),
            },
            generation: self.logo_generation,
        }
    }

    fn current_generation(&self, slot: Slot) -> u64 {
        match slot {
            Slot::Background => self.background_generation,
            Slot::Logo => self.logo_generation,
        }
    }

    /// Apply a completed load, unless a newer request for the same slot has been made since.
    pub fn finish(&mut self, outcome: LoadOutcome) -> TintmarkResult<LoadResolution> {
        let LoadOutcome { ticket, result } = outcome;
        let slot = ticket.slot();
        if ticket.generation != self.current_generation(slot) {
            tracing::debug!(
                ?slot,
                generation = ticket.generation,
                current = self.current_generation(slot),
                "discarding superseded load"
            );
            return Ok(LoadResolution::Superseded);
        }

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(?slot, error = %e, "image load failed");
                self.set_status(match slot {
                    Slot::Background => Status::BackgroundLoadFailed,
                    Slot::Logo => Status::LogoLoadFailed,
                });
                return Ok(LoadResolution::Failed {
                    reason: e.to_string(),
                });
            }
        };

        match ticket.target {
            LoadTarget::GalleryBackground { name } => {
                self.update(|p| p.with_background(Some(Background::Gallery { name, image })))?;
            }
            LoadTarget::UploadedBackground { name } => {
                self.update(|p| p.with_background(Some(Background::Uploaded { name, image })))?;
            }
            LoadTarget::Logo { name } => {
                self.update(|p| p.with_logo(Some(Logo { name, image })))?;
            }
        }
        Ok(LoadResolution::Applied)
    }

    /// Load a background on the rayon pool; collect it with [`Loader::recv`] and [`Self::finish`].
    pub fn request_background(
        &mut self,
        loader: &Loader,
        request: BackgroundRequest,
    ) -> TintmarkResult<LoadTicket> {
        let (ticket, source) = self.begin_background(request)?;
        loader.spawn(ticket.clone(), source);
        Ok(ticket)
    }

    pub fn request_logo(&mut self, loader: &Loader, source: AssetSource) -> LoadTicket {
        let ticket = self.begin_logo(&source);
        loader.spawn(ticket.clone(), source);
        ticket
    }

    pub fn select_gallery(&mut self, name: &str) -> TintmarkResult<LoadResolution> {
        let (ticket, source) = self.begin_background(BackgroundRequest::Gallery(name.to_owned()))?;
        self.finish(LoadOutcome::run(ticket, &source))
    }

    pub fn upload_background(&mut self, source: AssetSource) -> TintmarkResult<LoadResolution> {
        let (ticket, source) = self.begin_background(BackgroundRequest::Uploaded(source))?;
        self.finish(LoadOutcome::run(ticket, &source))
    }

    pub fn upload_logo(&mut self, source: AssetSource) -> TintmarkResult<LoadResolution> {
        let ticket = self.begin_logo(&source);
        self.finish(LoadOutcome::run(ticket, &source))
    }

    /// Encode the current canvas. Only allowed once both a background and a logo are set.
    pub fn export(&mut self) -> TintmarkResult<ExportedPng> {
        if !self.report.export_enabled {
            return Err(TintmarkError::validation(format!(
                "export is disabled: {}",
                self.status
            )));
        }
        encode_png(&self.surface).inspect_err(|e| {
            tracing::warn!(error = %e, "export failed");
            self.set_status(Status::ExportFailed);
        })
    }

    pub fn export_to_dir(&mut self, dir: &Path) -> TintmarkResult<PathBuf> {
        let png = self.export()?;
        png.write_to_dir(dir).inspect_err(|e| {
            tracing::warn!(error = %e, "writing export failed");
            self.set_status(Status::ExportFailed);
        })
    }
}
