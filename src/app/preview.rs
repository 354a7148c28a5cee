//! Background preview resolution and texture upload

use super::App;
use crate::preview::{PreviewSource, ResolvedPreview};
use eframe::egui;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Hand-off from resolution tasks to the UI thread. Holds at most one result and
/// never lets an older generation replace a newer one, whatever order tasks finish in.
#[derive(Clone, Default)]
pub struct PreviewSlot {
    inner: Arc<Mutex<Option<(u64, ResolvedPreview)>>>,
}

impl PreviewSlot {
    /// Store `preview` unless a result from a newer request is already waiting.
    /// Returns whether it was stored.
    pub fn offer(&self, generation: u64, preview: ResolvedPreview) -> bool {
        let Ok(mut guard) = self.inner.lock() else {
            return false;
        };
        if guard.as_ref().is_some_and(|(stored, _)| *stored > generation) {
            debug!(generation, "Older preview finished late, discarded");
            return false;
        }
        *guard = Some((generation, preview));
        true
    }

    /// Take the waiting result if it belongs to `current`. Older results are dropped.
    pub fn take(&self, current: u64) -> Option<ResolvedPreview> {
        let mut guard = self.inner.lock().ok()?;
        match guard.as_ref().map(|(generation, _)| *generation) {
            Some(generation) if generation == current => guard.take().map(|(_, p)| p),
            Some(generation) if generation < current => {
                debug!(generation, current, "Dropping stale preview");
                *guard = None;
                None
            }
            _ => None,
        }
    }
}

impl App {
    /// Kick off preview resolution for the current selection. Any resolution still
    /// in flight is cancelled and its result will be ignored.
    pub fn request_preview(&mut self, ctx: &egui::Context) {
        if let Some(token) = self.preview_cancel.take() {
            token.cancel();
        }
        self.preview_generation += 1;
        let generation = self.preview_generation;
        let selection = self.selected();
        debug!(generation, selection = ?selection.as_ref().map(|s| &s.name), "Resolving preview");

        let token = CancellationToken::new();
        self.preview_cancel = Some(token.clone());
        self.preview_loading = true;

        let resolver = self.resolver.clone();
        let slot = self.preview_slot.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(generation, "Preview resolution cancelled");
                }
                preview = resolver.resolve(selection.as_ref()) => {
                    if slot.offer(generation, preview) {
                        ctx.request_repaint();
                    }
                }
            }
        });
    }

    /// Upload a finished preview, dropping results from superseded requests.
    pub fn poll_preview(&mut self, ctx: &egui::Context) {
        let Some(preview) = self.preview_slot.take(self.preview_generation) else {
            return;
        };

        let size = [preview.image.width() as usize, preview.image.height() as usize];
        self.preview_texture = Some(ctx.load_texture(
            "map_preview",
            egui::ColorImage::from_rgba_unmultiplied(size, preview.image.as_raw()),
            egui::TextureOptions::LINEAR,
        ));
        self.preview_source = preview.source;
        self.preview_loading = false;
        self.preview_cancel = None;
    }

    /// Run the selection check, requesting a preview when the highlighted map changed.
    pub fn tick_selection(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let current = self.selected().map(|s| s.name);
        if self.selection_watcher.poll(now, current.as_deref()) {
            self.request_preview(ctx);
        }
        if self.selection_watcher.is_running() {
            ctx.request_repaint_after(self.selection_watcher.until_next(now));
        }
    }

    /// Stop background work before the window closes
    pub fn shutdown_preview(&mut self) {
        self.selection_watcher.stop();
        if let Some(token) = self.preview_cancel.take() {
            token.cancel();
        }
    }

    pub fn preview_caption(&self) -> &'static str {
        if self.preview_loading {
            return "Loading preview...";
        }
        match self.preview_source {
            PreviewSource::Local => "Local image",
            PreviewSource::Cached => "Workshop image (cached)",
            PreviewSource::Fetched => "Workshop image",
            PreviewSource::Placeholder => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn preview(source: PreviewSource, width: u32) -> ResolvedPreview {
        ResolvedPreview {
            source,
            image: Arc::new(RgbaImage::new(width, 1)),
        }
    }

    #[test]
    fn older_generation_finishing_last_does_not_replace_newer() {
        let slot = PreviewSlot::default();
        assert!(slot.offer(2, preview(PreviewSource::Cached, 2)));
        assert!(!slot.offer(1, preview(PreviewSource::Local, 1)));

        let taken = slot.take(2).unwrap();
        assert_eq!(taken.source, PreviewSource::Cached);
        assert_eq!(taken.image.width(), 2);
        assert!(slot.take(2).is_none());
    }

    #[test]
    fn newer_generation_replaces_waiting_older_one() {
        let slot = PreviewSlot::default();
        assert!(slot.offer(1, preview(PreviewSource::Local, 1)));
        assert!(slot.offer(2, preview(PreviewSource::Fetched, 2)));
        assert_eq!(slot.take(2).unwrap().source, PreviewSource::Fetched);
    }

    #[test]
    fn stale_result_is_dropped_on_take() {
        let slot = PreviewSlot::default();
        slot.offer(3, preview(PreviewSource::Local, 3));
        assert!(slot.take(4).is_none());
        // Gone, so the current request's result can land afterwards
        assert!(slot.offer(4, preview(PreviewSource::Placeholder, 4)));
        assert_eq!(slot.take(4).unwrap().image.width(), 4);
    }

    #[test]
    fn result_for_a_future_request_waits() {
        let slot = PreviewSlot::default();
        slot.offer(5, preview(PreviewSource::Cached, 5));
        assert!(slot.take(4).is_none());
        assert!(slot.take(5).is_some());
    }
}
