//! Pluggable cleanup strategies for Start Menu files and directories.
//!
//! Each strategy decides whether it can clean a single path and knows how to
//! clean it. The orchestrator offers every item to an ordered chain of
//! strategies; the first one that accepts the item claims it.

mod bad_shortcut;
mod empty_directory;
mod few_apps_with_cruft;
mod manual_directory;
mod manual_file;
mod single_app;

pub use bad_shortcut::BadShortcutFileCleaner;
pub use empty_directory::EmptyDirectoryCleaner;
pub use few_apps_with_cruft::{FewAppsWithCruftDirectoryCleaner, MAX_APPS};
pub use manual_directory::ManualConfigurationDirectoryCleaner;
pub use manual_file::ManualConfigurationFileCleaner;
pub use single_app::SingleAppDirectoryCleaner;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{CleanerError, Result};

/// Which strategy claimed an item. Used for logging and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CleanerType {
    BadShortcut,
    EmptyDirectory,
    SingleAppDirectory,
    FewAppsWithCruftDirectory,
    ManualConfiguration,
}

impl fmt::Display for CleanerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CleanerType::BadShortcut => "BadShortcut",
            CleanerType::EmptyDirectory => "EmptyDirectory",
            CleanerType::SingleAppDirectory => "SingleAppDirectory",
            CleanerType::FewAppsWithCruftDirectory => "FewAppsWithCruftDirectory",
            CleanerType::ManualConfiguration => "ManualConfiguration",
        };
        f.write_str(name)
    }
}

pub trait ItemCleaner {
    fn cleaner_type(&self) -> CleanerType;

    /// Whether this strategy accepts the item.
    ///
    /// Fails with a not-found error when the item does not exist.
    fn can_clean(&self, path: &Path) -> Result<bool>;

    /// Clean the item. Fails with [`CleanerError::InvalidOperation`] when
    /// [`can_clean`](ItemCleaner::can_clean) would return `false`.
    fn clean(&self, path: &Path) -> Result<()>;
}

/// A path claimed by a cleaner, waiting to be cleaned.
#[derive(Clone)]
pub struct ItemToClean {
    path: PathBuf,
    cleaner: Rc<dyn ItemCleaner>,
}

impl ItemToClean {
    pub fn new(path: PathBuf, cleaner: Rc<dyn ItemCleaner>) -> Self {
        ItemToClean { path, cleaner }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cleaner_type(&self) -> CleanerType {
        self.cleaner.cleaner_type()
    }

    pub fn clean(&self) -> Result<()> {
        self.cleaner.clean(&self.path)
    }
}

impl fmt::Debug for ItemToClean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemToClean")
            .field("path", &self.path)
            .field("cleaner_type", &self.cleaner_type())
            .finish()
    }
}

/// Offer `path` to each cleaner in order; the first that accepts it claims it.
pub fn claim(cleaners: &[Rc<dyn ItemCleaner>], path: &Path) -> Result<Option<ItemToClean>> {
    for cleaner in cleaners {
        if cleaner.can_clean(path)? {
            return Ok(Some(ItemToClean::new(path.to_path_buf(), Rc::clone(cleaner))));
        }
    }
    Ok(None)
}

pub(crate) fn validate_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CleanerError::DirectoryNotFound(path.to_path_buf()))
    }
}

pub(crate) fn validate_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CleanerError::FileNotFound(path.to_path_buf()))
    }
}

/// Immediate children of a directory, split into files and subdirectories.
#[derive(Debug, Default)]
pub(crate) struct DirectoryListing {
    pub files: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

/// Lists a directory's immediate children, each list sorted by path.
pub(crate) fn list_directory(path: &Path) -> Result<DirectoryListing> {
    let mut listing = DirectoryListing::default();

    for entry in fs::read_dir(path).map_err(|err| CleanerError::io(path, err))? {
        let entry = entry.map_err(|err| CleanerError::io(path, err))?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            listing.directories.push(entry_path);
        } else {
            listing.files.push(entry_path);
        }
    }

    listing.files.sort();
    listing.directories.sort();
    Ok(listing)
}

/// The directory that receives promoted files.
pub(crate) fn parent_directory(path: &Path) -> Result<&Path> {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .ok_or_else(|| CleanerError::DirectoryNotFound(path.to_path_buf()))
}

pub(crate) fn invalid_operation(cleaner: CleanerType, path: &Path) -> CleanerError {
    CleanerError::InvalidOperation {
        cleaner,
        path: path.to_path_buf(),
    }
}
