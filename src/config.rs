use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    assets::{color::Rgb8, gallery::Gallery, source::AssetSource},
    foundation::{core::AspectRatio, error::TintmarkResult},
    session::Session,
};

/// Composition settings read from JSON. Every field is optional; unset fields keep the form
/// defaults. Relative paths resolve against the config file's directory.
///
/// ```json
/// {
///   "gallery": { "harbor": "bg/harbor.jpg" },
///   "background": { "gallery": "harbor" },
///   "color": "#1e90ff",
///   "padding": 32,
///   "logo": "logo.svg",
///   "logo_width_pct": 25,
///   "ratio": "4:3"
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComposeConfig {
    #[serde(default)]
    pub gallery: Gallery,
    #[serde(default)]
    pub background: Option<BackgroundConfig>,
    #[serde(default)]
    pub color: Option<Rgb8>,
    #[serde(default)]
    pub padding: Option<u32>,
    #[serde(default)]
    pub logo: Option<PathBuf>,
    #[serde(default)]
    pub logo_width_pct: Option<u32>,
    #[serde(default)]
    pub ratio: Option<AspectRatio>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum BackgroundConfig {
    Gallery(String),
    File(PathBuf),
}

impl ComposeConfig {
    pub fn from_path(path: &Path) -> TintmarkResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let r = BufReader::new(f);
        let cfg: Self = serde_json::from_reader(r)
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Gallery entries with relative paths rebased onto `root`.
    pub fn gallery_at(&self, root: &Path) -> Gallery {
        self.gallery.clone().rooted_at(root)
    }

    /// Push every configured value through `session`, the same way form input would.
    pub fn apply(&self, session: &mut Session, root: &Path) -> TintmarkResult<()> {
        if let Some(ratio) = self.ratio {
            session.set_aspect_ratio(ratio)?;
        }
        if let Some(color) = self.color {
            session.set_overlay(color)?;
        }
        if let Some(padding) = self.padding {
            session.set_padding_px(padding)?;
        }
        if let Some(pct) = self.logo_width_pct {
            session.set_logo_width_pct(pct)?;
        }

        match &self.background {
            Some(BackgroundConfig::Gallery(name)) => {
                session.select_gallery(name)?.ensure_applied("background")?;
            }
            Some(BackgroundConfig::File(path)) => {
                let source = AssetSource::Path(root.join(path));
                session.upload_background(source)?.ensure_applied("background")?;
            }
            None => {}
        }

        if let Some(logo) = &self.logo {
            let source = AssetSource::Path(root.join(logo));
            session.upload_logo(source)?.ensure_applied("logo")?;
        }
        Ok(())
    }
}
