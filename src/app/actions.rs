//! Button handlers: activate, restore, folder helpers and option toggles

use super::{App, Confirm, Notice};
use crate::constants::{DEFAULT_WORKSHOP_DIR, HELP_URL};
use crate::mods::{self, LinkMode, MakeModsOutcome, RestoreOutcome};
use std::path::PathBuf;
use tracing::{info, warn};

impl App {
    pub fn link_mode(&self) -> LinkMode {
        if self.settings.use_symlinks {
            LinkMode::Symlink
        } else {
            LinkMode::Copy
        }
    }

    pub fn activate_selected(&mut self) {
        let source = self.selected().map(|s| s.path);
        let mode = self.link_mode();
        let notice = match mods::activate(source.as_deref(), &self.mods_dir(), mode) {
            Ok(_) => match mode {
                LinkMode::Symlink => Notice::info("Activate", "Symlink successfully created in mods"),
                LinkMode::Copy => Notice::info("Activate", "Map successfully copied to mods"),
            },
            Err(e) => {
                warn!(error = %e, "Activate failed");
                Notice::error("Activate", e)
            }
        };
        self.notify(notice);
    }

    pub fn restore_underpass(&mut self) {
        let notice = match mods::restore(&self.mods_dir()) {
            Ok(RestoreOutcome::Restored) => Notice::info("Restore Underpass", "Successfully restored Underpass"),
            Ok(RestoreOutcome::AlreadyRestored) => Notice::info("Restore Underpass", "Already restored Underpass"),
            Err(e) => {
                warn!(error = %e, "Restore failed");
                Notice::error("Restore Underpass", e)
            }
        };
        self.notify(notice);
    }

    /// Ask before creating the folder; the dialog calls `make_mods_dir` on OK.
    pub fn confirm_make_mods_dir(&mut self) {
        self.confirm = Some(Confirm::MakeModsDir);
    }

    pub fn make_mods_dir(&mut self) {
        let notice = match mods::make_mods_dir(&self.mods_dir()) {
            Ok(outcome) => {
                self.set_mods_dir(outcome.path().to_path_buf());
                match outcome {
                    MakeModsOutcome::Created(_) => Notice::info(
                        "Make mods folder",
                        "Successfully created folder. Changed mods dir to new folder.",
                    ),
                    MakeModsOutcome::AlreadyExists(_) => {
                        Notice::info("Make mods folder", "Mods folder already exists")
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Make mods folder failed");
                Notice::error("Make mods folder", e)
            }
        };
        self.notify(notice);
    }

    /// Open the selected map's folder, or the workshop folder when nothing is selected
    pub fn open_folder(&mut self) {
        let path = self
            .selected()
            .and_then(|s| s.item_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| self.workshop_dir());

        if !path.is_dir() {
            self.notify(Notice::error(
                "Open Folder",
                format!("Can't open folder. \"{}\" is not a valid directory.", path.display()),
            ));
            return;
        }
        if let Err(e) = open::that(&path) {
            warn!(error = %e, path = %path.display(), "Failed to open folder");
            self.notify(Notice::error("Open Folder", e));
        }
    }

    pub fn open_help(&mut self) {
        if let Err(e) = open::that(HELP_URL) {
            warn!(error = %e, "Failed to open help page");
        }
    }

    pub fn browse_workshop_dir(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Select Workshop Folder")
            .pick_folder()
        {
            self.set_workshop_dir(path);
        }
    }

    pub fn browse_mods_dir(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Select Mods Folder")
            .pick_folder()
        {
            self.set_mods_dir(path);
        }
    }

    pub fn set_workshop_dir(&mut self, path: PathBuf) {
        self.settings.workshop_dir = path.to_string_lossy().into_owned();
        self.workshop_dir_changed();
    }

    pub fn set_mods_dir(&mut self, path: PathBuf) {
        self.settings.set_active_mods_dir(path.to_string_lossy());
        self.save_settings();
    }

    /// Called after the workshop path was edited in any way
    pub fn workshop_dir_changed(&mut self) {
        self.refresh_files();
        self.save_settings();
    }

    /// Reset both path fields to the built-in defaults for the current mode
    pub fn set_defaults(&mut self) {
        info!(eg_mode = self.settings.eg_mode, "Resetting paths to defaults");
        self.settings.workshop_dir = DEFAULT_WORKSHOP_DIR.to_string();
        let mods = self.settings.default_mods_dir();
        self.settings.set_active_mods_dir(mods);
        self.workshop_dir_changed();
    }

    /// Switch between the Steam and Epic Games mods folders
    pub fn toggle_eg_mode(&mut self) {
        self.settings.eg_mode = !self.settings.eg_mode;
        info!(eg_mode = self.settings.eg_mode, mods = %self.settings.active_mods_dir(), "Loader mode changed");
        self.save_settings();
    }

    pub fn toggle_symlinks(&mut self) {
        self.settings.use_symlinks = !self.settings.use_symlinks;
        if self.settings.use_symlinks {
            self.notify(Notice::warning(
                "Use Symlinks",
                "Symlinks will only be created if RLMapLoader is run with admin privileges, or Developer Mode is \
                 enabled in Windows. Only use this if you know what you're doing.",
            ));
        }
        self.save_settings();
    }
}
