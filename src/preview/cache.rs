//! On-disk cache of fetched workshop previews, one `<id>.png` per item.
//!
//! Entries are written once, already resized, and never invalidated.

use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cached image unreadable: {0}")]
    Image(#[from] image::ImageError),
}

pub struct PreviewCache {
    dir: PathBuf,
}

impl PreviewCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.png", id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// `Ok(None)` when there is no entry for `id`
    pub async fn load(&self, id: &str) -> Result<Option<DynamicImage>, CacheError> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
        debug!(id, path = %path.display(), "Preview cache hit");
        Ok(Some(img))
    }

    /// Encode as PNG next to the final name, then rename into place so readers never
    /// see a half-written entry.
    pub async fn store(&self, id: &str, img: &DynamicImage) -> Result<PathBuf, CacheError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)?;

        let path = self.path_for(id);
        let partial = self.dir.join(format!("{}.png.part", id));
        tokio::fs::write(&partial, buf.into_inner()).await?;
        tokio::fs::rename(&partial, &path).await?;
        debug!(id, path = %path.display(), "Preview cached");
        Ok(path)
    }
}
