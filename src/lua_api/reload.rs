//! Hot-reload of Lua scripts through a file system watcher

use notify::Watcher;
use std::path::{Path, PathBuf};

use crate::error::MosaicResult;

/// Forwards modifications of `.lua` files under a directory to a channel
pub struct ScriptReloader {
    script_rx: crossbeam_channel::Receiver<PathBuf>,
    _watcher: notify::RecommendedWatcher,
}

impl ScriptReloader {
    pub fn watch(directory: impl AsRef<Path>) -> MosaicResult<Self> {
        let (script_tx, script_rx) = crossbeam_channel::unbounded::<PathBuf>();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) if event.kind.is_modify() => {
                    for path in event.paths.into_iter().filter(|path| is_script_path(path)) {
                        let _ = script_tx.send(path);
                    }
                }
                Ok(_) => {}
                Err(watch_error) => log::warn!("Watcher error: {}", watch_error),
            }
        })?;

        watcher.watch(directory.as_ref(), notify::RecursiveMode::Recursive)?;
        log::info!("Watching {} for script changes", directory.as_ref().display());

        Ok(Self {
            script_rx,
            _watcher: watcher,
        })
    }

    /// Blocks until at least one script changes, then drains the burst
    ///
    /// Editors often emit several modify events per save; each path appears
    /// once in the returned list. `None` means the watcher has shut down.
    pub fn next_changed(&self) -> Option<Vec<PathBuf>> {
        let first_path = self.script_rx.recv().ok()?;
        let mut changed_paths = vec![first_path];
        for path in self.script_rx.try_iter() {
            if !changed_paths.contains(&path) {
                changed_paths.push(path);
            }
        }
        Some(changed_paths)
    }

    /// Non-blocking variant of [`ScriptReloader::next_changed`]
    pub fn try_changed(&self) -> Vec<PathBuf> {
        let mut changed_paths: Vec<PathBuf> = Vec::new();
        for path in self.script_rx.try_iter() {
            if !changed_paths.contains(&path) {
                changed_paths.push(path);
            }
        }
        changed_paths
    }
}

pub fn is_script_path(path: &Path) -> bool {
    path.extension().map(|extension| extension == "lua").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lua_files_are_scripts() {
        assert!(is_script_path(Path::new("scripts/init.lua")));
        assert!(!is_script_path(Path::new("scripts/init.lua.bak")));
        assert!(!is_script_path(Path::new("1UBQ.pdb")));
        assert!(!is_script_path(Path::new("Makefile")));
    }

    #[test]
    fn watcher_starts_on_existing_directory_with_no_pending_changes() {
        let directory = tempfile::tempdir().unwrap();
        let reloader = ScriptReloader::watch(directory.path()).unwrap();
        assert!(reloader.try_changed().is_empty());
    }

    #[test]
    fn watching_a_missing_directory_fails() {
        let directory = tempfile::tempdir().unwrap();
        assert!(ScriptReloader::watch(directory.path().join("absent")).is_err());
    }
}
