//! Start Menu Cleaner - Removes installer cruft from Start Menu program folders
//!
//! Installers tend to create a folder per application in the Start Menu, often
//! holding a single shortcut next to a readme, a help file, an uninstaller and
//! a link to the vendor's website. Start Menu Cleaner flattens and removes
//! those folders while never touching anything it cannot classify.
//!
//! ## Architecture
//!
//! - [`classifier`] assigns a [`FileClassification`] to each file, looking
//!   through shortcuts at their targets.
//! - [`cleaners`] holds the strategies. Each one decides whether it can clean a
//!   file or directory and how to do it.
//! - [`fs_ops`] performs moves and deletes, or only logs them in simulate mode.
//! - [`cleaner`] walks the root folders, lets the first matching strategy claim
//!   each item, then cleans every claimed item independently.

pub mod classifier;
pub mod cleaner;
pub mod cleaners;
pub mod config;
pub mod error;
pub mod fs_ops;
pub mod lnk;
pub mod options;
pub mod shortcut;

// Re-export commonly used items
pub use classifier::{ClassifiedFile, FileClassification, FileClassifier};
pub use cleaner::{ClaimedItem, CleanFailure, CleanReport, Cleaner, ItemsToClean};
pub use cleaners::{CleanerType, ItemCleaner, ItemToClean};
pub use config::{
    CleanerConfig, ManualConfigurationLoader, ManualDirectoryRemoveConfiguration,
    ManualFileRemoveConfiguration,
};
pub use error::CleanerError;
pub use fs_ops::{FileOperation, FileSystemOperationHandler};
pub use lnk::LnkShortcutResolver;
pub use options::{known_start_menu_programs_folders, CleanerOptions, DIRECTORIES_TO_IGNORE};
pub use shortcut::{FileShortcut, InMemoryShortcutResolver, ShortcutHandler, ShortcutResolver};
