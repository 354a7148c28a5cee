//! Workshop folder scanning and the file list shown in the sidebar

use crate::constants::MAP_EXTENSION;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A map file found in the workshop folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopFile {
    pub name: String,
    pub path: PathBuf,
}

/// The currently chosen map, by display name and absolute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub path: PathBuf,
}

impl Selection {
    /// Folder holding the map file; preview images are looked up here
    pub fn item_dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Workshop item id, which is the name of the folder holding the map
    pub fn workshop_id(&self) -> Option<String> {
        self.item_dir()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|id| !id.is_empty())
    }
}

impl From<&WorkshopFile> for Selection {
    fn from(file: &WorkshopFile) -> Self {
        Self {
            name: file.name.clone(),
            path: file.path.clone(),
        }
    }
}

/// List map files one folder deep plus any loose in the workshop folder itself.
///
/// Sorted by lowercase file name. File names are the list key, so when two
/// folders hold a file of the same name the later one wins.
pub fn scan_workshop_dir(dir: &Path) -> Vec<WorkshopFile> {
    if !dir.is_dir() {
        debug!(path = %dir.display(), "Workshop dir missing, empty list");
        return Vec::new();
    }

    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let patterns = [
        format!("{}/*/*.{}", base, MAP_EXTENSION),
        format!("{}/*.{}", base, MAP_EXTENSION),
    ];

    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in &patterns {
        match glob::glob(pattern) {
            Ok(entries) => paths.extend(entries.filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable workshop entry");
                    None
                }
            })),
            Err(e) => warn!(error = %e, pattern = %pattern, "Bad workshop glob pattern"),
        }
    }

    paths.sort_by_key(|p| file_name(p).to_lowercase());

    let mut files: Vec<WorkshopFile> = Vec::with_capacity(paths.len());
    let mut by_name: HashMap<String, usize> = HashMap::new();
    for path in paths {
        let name = file_name(&path);
        match by_name.get(&name) {
            Some(&idx) => files[idx].path = path,
            None => {
                by_name.insert(name.clone(), files.len());
                files.push(WorkshopFile { name, path });
            }
        }
    }

    debug!(path = %dir.display(), count = files.len(), "Workshop dir scanned");
    files
}

/// Case-insensitive substring match on the file name; an empty query keeps everything.
pub fn filter_files(files: &[WorkshopFile], query: &str) -> Vec<WorkshopFile> {
    let query = query.to_lowercase();
    files
        .iter()
        .filter(|f| query.is_empty() || f.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
