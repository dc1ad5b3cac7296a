//! Run options: which folders to clean, which to skip, and simulate mode.

use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

/// Folder names that belong to Windows itself and are never touched.
pub const DIRECTORIES_TO_IGNORE: &[&str] = &[
    "accessibility",
    "accessories",
    "administrative tools",
    "chrome apps",
    "maintenance",
    "startup",
    "system tools",
    "windows accessories",
    "windows administrative tools",
    "windows ease of access",
    "windows powershell",
    "windows system",
];

const START_MENU_PROGRAMS: &[&str] = &["Microsoft", "Windows", "Start Menu", "Programs"];

#[derive(Debug, Clone)]
pub struct CleanerOptions {
    root_folders_to_clean: Vec<PathBuf>,
    folders_to_ignore: HashSet<String>,
    simulate: bool,
}

impl CleanerOptions {
    /// Options for `root_folders_to_clean` with the built-in ignore list.
    pub fn new(root_folders_to_clean: Vec<PathBuf>) -> Self {
        Self::with_ignored(root_folders_to_clean, std::iter::empty::<String>())
    }

    /// Options with extra folder names to ignore on top of the built-in list.
    pub fn with_ignored<I, S>(root_folders_to_clean: Vec<PathBuf>, extra_ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folders_to_ignore = DIRECTORIES_TO_IGNORE
            .iter()
            .map(|name| name.to_lowercase())
            .chain(extra_ignored.into_iter().map(|name| name.as_ref().trim().to_lowercase()))
            .filter(|name| !name.is_empty())
            .collect();

        CleanerOptions {
            root_folders_to_clean,
            folders_to_ignore,
            simulate: false,
        }
    }

    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    pub fn root_folders_to_clean(&self) -> &[PathBuf] {
        &self.root_folders_to_clean
    }

    pub fn folders_to_ignore(&self) -> &HashSet<String> {
        &self.folders_to_ignore
    }

    pub fn is_simulate(&self) -> bool {
        self.simulate
    }

    /// Whether a directory with this name is excluded from cleaning.
    pub fn is_ignored(&self, directory_path: &Path) -> bool {
        directory_path
            .file_name()
            .map(|name| {
                self.folders_to_ignore
                    .contains(&name.to_string_lossy().to_lowercase())
            })
            .unwrap_or(false)
    }
}

/// The per-user and all-users Start Menu "Programs" folders.
///
/// Folders whose base location is unknown on this system are omitted.
pub fn known_start_menu_programs_folders() -> Vec<PathBuf> {
    let user_base = dirs::data_dir();
    let common_base = env::var_os("PROGRAMDATA").map(PathBuf::from);

    [user_base, common_base]
        .into_iter()
        .flatten()
        .map(|base| START_MENU_PROGRAMS.iter().fold(base, |path, part| path.join(part)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_ignore_list_is_always_present() {
        let options = CleanerOptions::new(vec![PathBuf::from("/menu")]);
        for name in DIRECTORIES_TO_IGNORE {
            assert!(options.folders_to_ignore().contains(*name));
        }
        assert!(!options.is_simulate());
        assert_eq!(options.root_folders_to_clean(), [PathBuf::from("/menu")]);
    }

    #[test]
    fn test_extra_ignores_are_merged_case_insensitively() {
        let options =
            CleanerOptions::with_ignored(vec![PathBuf::from("/menu")], ["Games", "  ", " Tools "]);

        assert!(options.is_ignored(Path::new("/menu/GAMES")));
        assert!(options.is_ignored(Path::new("/menu/tools")));
        assert!(options.is_ignored(Path::new("/menu/Windows PowerShell")));
        assert!(options.is_ignored(Path::new("/menu/Maintenance")));
        assert!(!options.is_ignored(Path::new("/menu/MyApp")));
        assert!(!options.folders_to_ignore().contains(""));
        assert_eq!(
            options.folders_to_ignore().len(),
            DIRECTORIES_TO_IGNORE.len() + 2
        );
    }

    #[test]
    fn test_simulate_builder() {
        let options = CleanerOptions::new(Vec::new()).simulate(true);
        assert!(options.is_simulate());
        assert!(options.root_folders_to_clean().is_empty());
    }
}
