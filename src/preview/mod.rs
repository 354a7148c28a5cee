//! Preview image resolution for the selected map
//!
//! Sources are tried in order: an image next to the map file, the fetched-preview
//! cache, the Steam Workshop page, and finally the placeholder.

mod cache;
pub mod placeholder;
mod remote;

pub use cache::PreviewCache;
pub use remote::{FetchError, HttpPageSource, PageSource, WorkshopItem};

use crate::constants::PREVIEW_EXTENSIONS;
use crate::workshop::Selection;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which tier produced a preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSource {
    Local,
    Cached,
    Fetched,
    Placeholder,
}

#[derive(Clone)]
pub struct ResolvedPreview {
    pub source: PreviewSource,
    pub image: Arc<RgbaImage>,
}

pub struct PreviewResolver<S> {
    pages: S,
    cache: PreviewCache,
    bounds: (u32, u32),
    placeholder: Arc<RgbaImage>,
}

impl<S: PageSource> PreviewResolver<S> {
    pub fn new(pages: S, cache: PreviewCache, bounds: (u32, u32), placeholder: RgbaImage) -> Self {
        Self {
            pages,
            cache,
            bounds,
            placeholder: Arc::new(placeholder),
        }
    }

    #[cfg(test)]
    pub fn cache(&self) -> &PreviewCache {
        &self.cache
    }

    pub fn placeholder(&self) -> ResolvedPreview {
        ResolvedPreview {
            source: PreviewSource::Placeholder,
            image: self.placeholder.clone(),
        }
    }

    /// Pick the image to show for `selection`. Makes at most one network attempt and
    /// only writes to the cache after a successful fetch.
    pub async fn resolve(&self, selection: Option<&Selection>) -> ResolvedPreview {
        let Some(selection) = selection else {
            return self.placeholder();
        };

        if let Some(dir) = selection.item_dir() {
            let dir = dir.to_path_buf();
            let bounds = self.bounds;
            match tokio::task::spawn_blocking(move || load_local_image(&dir, bounds)).await {
                Ok(Some(img)) => return self.found(PreviewSource::Local, img),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Local preview task failed"),
            }
        }

        let Some(id) = selection.workshop_id() else {
            return self.placeholder();
        };

        // A cache entry is final: if it can't be read we don't go back to the network.
        if self.cache.contains(&id) {
            return match self.cache.load(&id).await {
                Ok(Some(img)) => self.found(PreviewSource::Cached, img),
                Ok(None) => self.placeholder(),
                Err(e) => {
                    warn!(error = %e, id = %id, "Cached preview unreadable");
                    self.placeholder()
                }
            };
        }

        match self.fetch_and_cache(&id).await {
            Ok(img) => self.found(PreviewSource::Fetched, img),
            Err(FetchError::ItemNotFound) => {
                debug!(id = %id, "No workshop item for this map");
                self.placeholder()
            }
            Err(e) => {
                warn!(error = %e, id = %id, "Workshop preview fetch failed");
                self.placeholder()
            }
        }
    }

    async fn fetch_and_cache(&self, id: &str) -> Result<DynamicImage, FetchError> {
        let item = WorkshopItem::fetch(&self.pages, id).await?;
        info!(id, title = %item.title, "Found workshop item");
        let img = fit_within(&item.fetch_image(&self.pages).await?, self.bounds);
        if let Err(e) = self.cache.store(id, &img).await {
            warn!(error = %e, id, "Couldn't cache workshop preview");
        }
        Ok(img)
    }

    fn found(&self, source: PreviewSource, img: DynamicImage) -> ResolvedPreview {
        ResolvedPreview {
            source,
            image: Arc::new(img.to_rgba8()),
        }
    }
}

/// Last image in `dir` when scanning png, jpg, jpeg, bmp in turn (names sorted within each).
/// Extensions are matched case-sensitively.
pub fn find_local_image(dir: &Path) -> Option<PathBuf> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let options = glob::MatchOptions {
        case_sensitive: true,
        ..Default::default()
    };

    PREVIEW_EXTENSIONS
        .iter()
        .filter_map(|ext| glob::glob_with(&format!("{}/*.{}", base, ext), options).ok())
        .flat_map(|paths| paths.filter_map(Result::ok))
        .filter(|p| p.is_file())
        .last()
}

/// Decode and fit the local preview for `dir`, if there is a readable one. Blocking.
fn load_local_image(dir: &Path, bounds: (u32, u32)) -> Option<DynamicImage> {
    let path = find_local_image(dir)?;
    match image::open(&path) {
        Ok(img) => {
            debug!(path = %path.display(), "Using local preview");
            Some(fit_within(&img, bounds))
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Local preview unreadable");
            None
        }
    }
}

/// Shrink to fit inside `bounds` keeping the aspect ratio. Smaller images are left alone.
pub fn fit_within(img: &DynamicImage, (width, height): (u32, u32)) -> DynamicImage {
    if img.width() <= width && img.height() <= height {
        img.clone()
    } else {
        img.resize(width, height, FilterType::Lanczos3)
    }
}
