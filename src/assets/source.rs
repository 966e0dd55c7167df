use std::{borrow::Cow, path::PathBuf, sync::Arc};

use anyhow::Context as _;

use crate::{
    assets::decode::{Raster, decode_asset},
    foundation::error::TintmarkResult,
};

/// Where image bytes come from: a file on disk or an in-memory upload.
#[derive(Clone, Debug)]
pub enum AssetSource {
    Path(PathBuf),
    Memory { name: String, bytes: Arc<[u8]> },
}

impl AssetSource {
    pub fn memory(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Display name: the file name for paths, the upload name otherwise.
    pub fn name(&self) -> String {
        match self {
            AssetSource::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            AssetSource::Memory { name, .. } => name.clone(),
        }
    }

    pub fn read(&self) -> TintmarkResult<Cow<'_, [u8]>> {
        match self {
            AssetSource::Path(p) => {
                let bytes =
                    std::fs::read(p).with_context(|| format!("read image '{}'", p.display()))?;
                Ok(Cow::Owned(bytes))
            }
            AssetSource::Memory { bytes, .. } => Ok(Cow::Borrowed(&bytes[..])),
        }
    }

    /// Read and decode.
    #[tracing::instrument(skip(self), fields(source = %self.name()))]
    pub fn load(&self) -> TintmarkResult<Raster> {
        let bytes = self.read()?;
        let raster = decode_asset(&bytes, &self.name())?;
        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            "decoded image"
        );
        Ok(raster)
    }
}

impl From<PathBuf> for AssetSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}
