//! App module - contains the main application state and logic

mod actions;
mod filters;
mod modals;
mod preview;
mod selection;
mod views;

pub(crate) use filters::ListAction;
pub(crate) use modals::{Confirm, Notice};
pub(crate) use preview::PreviewSlot;
pub(crate) use selection::SelectionWatcher;

use crate::constants::*;
use crate::preview::{placeholder, HttpPageSource, PreviewCache, PreviewResolver, PreviewSource};
use crate::settings::Settings;
use crate::theme;
use crate::utils::get_cache_dir;
use crate::workshop::{scan_workshop_dir, Selection, WorkshopFile};
use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

type AppInitError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    // Workshop list
    pub(crate) all_files: Vec<WorkshopFile>,
    pub(crate) files: Vec<WorkshopFile>,
    pub(crate) search_query: String,
    pub(crate) selected: Option<usize>,
    // Preview
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) resolver: Arc<PreviewResolver<HttpPageSource>>,
    pub(crate) selection_watcher: SelectionWatcher,
    pub(crate) preview_slot: PreviewSlot,
    pub(crate) preview_generation: u64,
    pub(crate) preview_cancel: Option<CancellationToken>,
    pub(crate) preview_texture: Option<egui::TextureHandle>,
    pub(crate) preview_source: PreviewSource,
    pub(crate) preview_loading: bool,
    // Dialogs
    pub(crate) notice: Option<Notice>,
    pub(crate) confirm: Option<Confirm>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Result<Self, AppInitError> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let cache_dir = get_cache_dir(&data_dir);
        std::fs::create_dir_all(&cache_dir).ok();

        let resolver = PreviewResolver::new(
            HttpPageSource::new()?,
            PreviewCache::new(cache_dir),
            PREVIEW_SIZE,
            placeholder::load(&data_dir, PREVIEW_SIZE),
        );

        let mut selection_watcher = SelectionWatcher::new(SELECTION_POLL_INTERVAL);
        selection_watcher.start();

        let mut app = Self {
            settings,
            data_dir,
            all_files: Vec::new(),
            files: Vec::new(),
            search_query: String::new(),
            selected: None,
            runtime: tokio::runtime::Runtime::new()?,
            resolver: Arc::new(resolver),
            selection_watcher,
            preview_slot: PreviewSlot::default(),
            preview_generation: 0,
            preview_cancel: None,
            preview_texture: None,
            preview_source: PreviewSource::Placeholder,
            preview_loading: false,
            notice: None,
            confirm: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
        };

        app.refresh_files();
        info!(
            workshop = %app.settings.workshop_dir,
            mods = %app.settings.active_mods_dir(),
            maps = app.all_files.len(),
            "App initialized"
        );
        Ok(app)
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }

    /// Re-read the workshop folder and re-apply the search filter
    pub fn refresh_files(&mut self) {
        self.all_files = scan_workshop_dir(Path::new(&self.settings.workshop_dir));
        self.apply_search();
    }

    /// The highlighted map, looked up fresh from the visible list
    pub fn selected(&self) -> Option<Selection> {
        self.selected
            .and_then(|idx| self.files.get(idx))
            .map(Selection::from)
    }

    pub fn workshop_dir(&self) -> PathBuf {
        PathBuf::from(&self.settings.workshop_dir)
    }

    pub fn mods_dir(&self) -> PathBuf {
        PathBuf::from(self.settings.active_mods_dir())
    }
}
