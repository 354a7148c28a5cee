//! Activating and restoring maps in the game's mods folder

use crate::constants::{ACTIVE_MAP_FILENAME, COOKED_DIR_NAME, MODS_DIR_NAME};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ModsDirError {
    #[error("Invalid path: Mods path given is not a real directory")]
    NotADirectory,
    #[error("Invalid path: Mods path must lead to a folder called 'mods'")]
    WrongName,
}

#[derive(Debug, Error)]
pub enum ActivateError {
    #[error("Cannot activate: No map selected")]
    NoSelection,
    #[error("Cannot activate: File not found")]
    SourceMissing,
    #[error(transparent)]
    ModsDir(#[from] ModsDirError),
    #[error("Couldn't remove the previous map: {0}")]
    RemoveExisting(#[source] io::Error),
    #[error("Couldn't create symlink: {0}")]
    Symlink(#[source] io::Error),
    #[error("Couldn't copy map: {0}")]
    Copy(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error(transparent)]
    ModsDir(#[from] ModsDirError),
    #[error("Couldn't delete Labs_Underpass_P.upk: {0}")]
    Remove(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum MakeModsError {
    #[error("Can't create mods folder. Must be located within \\CookedPCConsole")]
    NotInCookedDir,
    #[error("Path specified in mods dir is not a real directory")]
    ParentMissing,
    #[error("Couldn't create mods folder: {0}")]
    Io(#[source] io::Error),
}

/// How the selected map is placed into the mods folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Copy,
    Symlink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    AlreadyRestored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MakeModsOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

impl MakeModsOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(p) | Self::AlreadyExists(p) => p,
        }
    }
}

/// A mods path must be an existing directory named "mods" (any case).
pub fn validate_mods_dir(path: &Path) -> Result<(), ModsDirError> {
    if !path.is_dir() {
        return Err(ModsDirError::NotADirectory);
    }
    let named_mods = path
        .file_name()
        .map(|n| n.to_string_lossy().eq_ignore_ascii_case(MODS_DIR_NAME))
        .unwrap_or(false);
    if !named_mods {
        return Err(ModsDirError::WrongName);
    }
    Ok(())
}

/// Place `source` into the mods folder under the fixed map name, replacing whatever was there.
pub fn activate(
    source: Option<&Path>,
    mods_dir: &Path,
    mode: LinkMode,
) -> Result<PathBuf, ActivateError> {
    let source = source.ok_or(ActivateError::NoSelection)?;
    if !source.is_file() {
        return Err(ActivateError::SourceMissing);
    }
    validate_mods_dir(mods_dir)?;

    let dest = mods_dir.join(ACTIVE_MAP_FILENAME);
    // symlink_metadata so a dangling link from an earlier activation still counts
    if dest.symlink_metadata().is_ok() {
        std::fs::remove_file(&dest).map_err(ActivateError::RemoveExisting)?;
        debug!(path = %dest.display(), "Removed previous map");
    }

    match mode {
        LinkMode::Symlink => {
            symlink_file(source, &dest).map_err(ActivateError::Symlink)?;
        }
        LinkMode::Copy => {
            std::fs::copy(source, &dest).map_err(ActivateError::Copy)?;
        }
    }

    info!(source = %source.display(), dest = %dest.display(), ?mode, "Map activated");
    Ok(dest)
}

/// Remove the activated map so the game falls back to its own.
pub fn restore(mods_dir: &Path) -> Result<RestoreOutcome, RestoreError> {
    validate_mods_dir(mods_dir)?;

    let dest = mods_dir.join(ACTIVE_MAP_FILENAME);
    if dest.symlink_metadata().is_err() {
        debug!(path = %dest.display(), "Nothing to restore");
        return Ok(RestoreOutcome::AlreadyRestored);
    }
    std::fs::remove_file(&dest).map_err(RestoreError::Remove)?;
    info!(path = %dest.display(), "Map restored");
    Ok(RestoreOutcome::Restored)
}

/// Create `mods` inside CookedPCConsole. `path` may be CookedPCConsole itself or any
/// folder directly inside it (usually a mods path that doesn't exist yet).
pub fn make_mods_dir(path: &Path) -> Result<MakeModsOutcome, MakeModsError> {
    let cooked = if is_cooked(path) {
        path
    } else {
        path.parent()
            .filter(|p| is_cooked(p))
            .ok_or(MakeModsError::NotInCookedDir)?
    };

    let mods = cooked.join(MODS_DIR_NAME);
    match std::fs::create_dir(&mods) {
        Ok(()) => {
            info!(path = %mods.display(), "Created mods folder");
            Ok(MakeModsOutcome::Created(mods))
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(MakeModsOutcome::AlreadyExists(mods)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MakeModsError::ParentMissing),
        Err(e) => Err(MakeModsError::Io(e)),
    }
}

fn is_cooked(path: &Path) -> bool {
    path.file_name().map(|n| n == COOKED_DIR_NAME).unwrap_or(false)
}

#[cfg(unix)]
fn symlink_file(source: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(windows)]
fn symlink_file(source: &Path, dest: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("workshop/123/MapA.udk");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, b"map data").unwrap();
        let mods = tmp.path().join("CookedPCConsole/mods");
        fs::create_dir_all(&mods).unwrap();
        (tmp, source, mods)
    }

    #[test]
    fn validate_accepts_mods_in_any_case() {
        let tmp = tempdir().unwrap();
        for name in ["mods", "Mods", "MODS"] {
            let dir = tmp.path().join(format!("{}-parent", name)).join(name);
            fs::create_dir_all(&dir).unwrap();
            assert!(validate_mods_dir(&dir).is_ok(), "{}", name);
        }
    }

    #[test]
    fn validate_rejects_missing_file_and_wrong_name() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            validate_mods_dir(&tmp.path().join("mods")),
            Err(ModsDirError::NotADirectory)
        ));

        let file = tmp.path().join("mods-file");
        fs::write(&file, b"").unwrap();
        assert!(matches!(validate_mods_dir(&file), Err(ModsDirError::NotADirectory)));

        let other = tmp.path().join("mod");
        fs::create_dir(&other).unwrap();
        assert!(matches!(validate_mods_dir(&other), Err(ModsDirError::WrongName)));
    }

    #[test]
    fn activate_copies_and_replaces() {
        let (_tmp, source, mods) = setup();
        let dest = mods.join(ACTIVE_MAP_FILENAME);
        fs::write(&dest, b"old map").unwrap();

        let out = activate(Some(source.as_path()), &mods, LinkMode::Copy).unwrap();
        assert_eq!(out, dest);
        assert_eq!(fs::read(&dest).unwrap(), b"map data");
        assert!(!dest.symlink_metadata().unwrap().file_type().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn activate_symlinks_in_symlink_mode() {
        let (_tmp, source, mods) = setup();
        let dest = activate(Some(source.as_path()), &mods, LinkMode::Symlink).unwrap();
        assert!(dest.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&dest).unwrap(), source);

        // A second activation replaces the link instead of failing
        let dest = activate(Some(source.as_path()), &mods, LinkMode::Copy).unwrap();
        assert!(!dest.symlink_metadata().unwrap().file_type().is_symlink());
    }

    #[test]
    fn activate_errors_leave_mods_untouched() {
        let (tmp, source, mods) = setup();
        assert!(matches!(activate(None, &mods, LinkMode::Copy), Err(ActivateError::NoSelection)));
        assert!(matches!(
            activate(Some(tmp.path().join("gone.udk").as_path()), &mods, LinkMode::Copy),
            Err(ActivateError::SourceMissing)
        ));

        let wrong = tmp.path().join("CookedPCConsole");
        assert!(matches!(
            activate(Some(source.as_path()), &wrong, LinkMode::Copy),
            Err(ActivateError::ModsDir(ModsDirError::WrongName))
        ));
        assert!(!wrong.join(ACTIVE_MAP_FILENAME).exists());
        assert!(!mods.join(ACTIVE_MAP_FILENAME).exists());
    }

    #[test]
    fn restore_removes_then_reports_already_restored() {
        let (_tmp, source, mods) = setup();
        activate(Some(source.as_path()), &mods, LinkMode::Copy).unwrap();

        assert_eq!(restore(&mods).unwrap(), RestoreOutcome::Restored);
        assert!(!mods.join(ACTIVE_MAP_FILENAME).exists());
        assert_eq!(restore(&mods).unwrap(), RestoreOutcome::AlreadyRestored);
    }

    #[test]
    fn restore_validates_path() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            restore(&tmp.path().join("mods")),
            Err(RestoreError::ModsDir(ModsDirError::NotADirectory))
        ));
    }

    #[test]
    fn make_mods_from_cooked_dir_or_child() {
        let tmp = tempdir().unwrap();
        let cooked = tmp.path().join(COOKED_DIR_NAME);
        fs::create_dir(&cooked).unwrap();

        let created = make_mods_dir(&cooked).unwrap();
        assert_eq!(created, MakeModsOutcome::Created(cooked.join("mods")));
        assert!(cooked.join("mods").is_dir());

        let again = make_mods_dir(&cooked.join("mods")).unwrap();
        assert_eq!(again, MakeModsOutcome::AlreadyExists(cooked.join("mods")));
    }

    #[test]
    fn make_mods_errors() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            make_mods_dir(&tmp.path().join("Somewhere/else")),
            Err(MakeModsError::NotInCookedDir)
        ));
        assert!(matches!(
            make_mods_dir(&tmp.path().join("missing").join(COOKED_DIR_NAME)),
            Err(MakeModsError::ParentMissing)
        ));
    }
}
