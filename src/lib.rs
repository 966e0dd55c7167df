//! Tintmark composes branded stills: a background cover-fitted to a fixed aspect ratio, a
//! half-transparent color wash over it, and a logo pinned to the top-right corner, exported as
//! PNG.
//!
//! The flow is session-oriented:
//!
//! - Create a [`Session`] (optionally with a [`Gallery`] of named backgrounds)
//! - Change inputs through its setters or load images; each change redraws once
//! - [`Session::export`] the canvas once a background and a logo are present
//!
//! [`compose`] is the pure render routine underneath, usable on its own with [`RenderParams`].
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod export;
pub mod foundation;
pub mod params;
pub mod render;
pub mod session;
pub mod status;

pub use crate::assets::color::{OVERLAY_ALPHA, Rgb8};
pub use crate::assets::decode::{Raster, decode_asset, decode_image, decode_svg};
pub use crate::assets::gallery::Gallery;
pub use crate::assets::loader::{LoadOutcome, LoadTarget, LoadTicket, Loader, Slot};
pub use crate::assets::source::AssetSource;
pub use crate::config::{BackgroundConfig, ComposeConfig};
pub use crate::export::{ExportedPng, encode_png, export_file_name};
pub use crate::foundation::core::{AspectRatio, OUTPUT_HEIGHT, OutputSize, Placement};
pub use crate::foundation::error::{TintmarkError, TintmarkResult};
pub use crate::params::{
    Background, DEFAULT_LOGO_WIDTH_PCT, DEFAULT_PADDING_PX, Logo, RenderParams,
    parse_logo_width_pct, parse_padding,
};
pub use crate::render::compositor::{RenderReport, compose, render};
pub use crate::render::geometry::{cover_fit, logo_placement, logo_scale, output_size};
pub use crate::render::surface::Surface;
pub use crate::session::{BackgroundRequest, LoadResolution, Session};
pub use crate::status::Status;
