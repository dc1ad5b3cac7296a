//! The orchestrator: finds items to clean under each root and cleans them.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{error, info, trace, warn};

use crate::classifier::FileClassifier;
use crate::cleaners::{
    claim, list_directory, BadShortcutFileCleaner, CleanerType, EmptyDirectoryCleaner,
    FewAppsWithCruftDirectoryCleaner, ItemCleaner, ItemToClean,
    ManualConfigurationDirectoryCleaner, ManualConfigurationFileCleaner,
    SingleAppDirectoryCleaner,
};
use crate::config::ManualConfigurationLoader;
use crate::fs_ops::{FileOperation, FileSystemOperationHandler};
use crate::options::CleanerOptions;
use crate::shortcut::{ShortcutHandler, ShortcutResolver};

/// An item that was claimed by a cleaner during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedItem {
    pub path: PathBuf,
    pub cleaner_type: CleanerType,
}

/// An item whose cleaning failed. The rest of the batch still ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanFailure {
    pub path: PathBuf,
    pub cleaner_type: CleanerType,
    pub error: String,
}

/// Outcome of [`Cleaner::start`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Claimed files followed by claimed directories, in discovery order.
    pub claimed: Vec<ClaimedItem>,
    pub failures: Vec<CleanFailure>,
    /// Filesystem operations performed (or simulated) during the run.
    pub operations: Vec<FileOperation>,
}

impl CleanReport {
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Items found under the root folders, split by kind.
#[derive(Debug, Default)]
pub struct ItemsToClean {
    pub files: Vec<ItemToClean>,
    pub directories: Vec<ItemToClean>,
}

impl ItemsToClean {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

pub struct Cleaner {
    options: CleanerOptions,
    operations: Rc<FileSystemOperationHandler>,
    file_cleaners: Vec<Rc<dyn ItemCleaner>>,
    directory_cleaners: Vec<Rc<dyn ItemCleaner>>,
}

impl Cleaner {
    pub fn new(
        options: CleanerOptions,
        operations: Rc<FileSystemOperationHandler>,
        file_cleaners: Vec<Rc<dyn ItemCleaner>>,
        directory_cleaners: Vec<Rc<dyn ItemCleaner>>,
    ) -> Self {
        Cleaner {
            options,
            operations,
            file_cleaners,
            directory_cleaners,
        }
    }

    /// A cleaner with every built-in strategy in its default order.
    ///
    /// Files: bad shortcut, manual configuration. Directories: empty, single
    /// app, few apps with cruft, manual configuration.
    pub fn with_default_cleaners(
        options: CleanerOptions,
        resolver: Rc<dyn ShortcutResolver>,
        configuration: &dyn ManualConfigurationLoader,
    ) -> Self {
        let operations = Rc::new(FileSystemOperationHandler::new(options.is_simulate()));
        let shortcuts = ShortcutHandler::new(resolver);
        let classifier = Rc::new(FileClassifier::new(shortcuts.clone()));

        let file_cleaners: Vec<Rc<dyn ItemCleaner>> = vec![
            Rc::new(BadShortcutFileCleaner::new(shortcuts, Rc::clone(&operations))),
            Rc::new(ManualConfigurationFileCleaner::new(
                configuration,
                Rc::clone(&operations),
            )),
        ];
        let directory_cleaners: Vec<Rc<dyn ItemCleaner>> = vec![
            Rc::new(EmptyDirectoryCleaner::new(Rc::clone(&operations))),
            Rc::new(SingleAppDirectoryCleaner::new(
                Rc::clone(&classifier),
                Rc::clone(&operations),
            )),
            Rc::new(FewAppsWithCruftDirectoryCleaner::new(
                Rc::clone(&classifier),
                Rc::clone(&operations),
            )),
            Rc::new(ManualConfigurationDirectoryCleaner::new(
                configuration,
                Rc::clone(&operations),
            )),
        ];

        Self::new(options, operations, file_cleaners, directory_cleaners)
    }

    pub fn options(&self) -> &CleanerOptions {
        &self.options
    }

    pub fn operations(&self) -> &FileSystemOperationHandler {
        &self.operations
    }

    /// Find and clean everything under the root folders.
    ///
    /// A failure on one item is logged and recorded; it never stops the batch.
    pub fn start(&self) -> CleanReport {
        if self.options.is_simulate() {
            info!("Simulating. No changes will be made.");
        }

        let items = self.find_items_to_clean();
        if items.is_empty() {
            info!("Nothing to clean.");
            return CleanReport::default();
        }

        log_found_items(&items.files);
        log_found_items(&items.directories);

        let operations_before = self.operations.operation_count();
        let mut report = CleanReport::default();

        info!("Cleaning.");
        for item in items.files.iter().chain(&items.directories) {
            report.claimed.push(ClaimedItem {
                path: item.path().to_path_buf(),
                cleaner_type: item.cleaner_type(),
            });

            info!("Cleaning {} {}", item.cleaner_type(), item.path().display());
            if let Err(err) = item.clean() {
                error!("Failed to clean {}: {err}", item.path().display());
                report.failures.push(CleanFailure {
                    path: item.path().to_path_buf(),
                    cleaner_type: item.cleaner_type(),
                    error: err.to_string(),
                });
            }
        }
        info!("Finished cleaning.");

        report.operations = self.operations.operations_since(operations_before);
        report
    }

    /// Claim files and subdirectories of every existing root folder.
    pub fn find_items_to_clean(&self) -> ItemsToClean {
        let mut items = ItemsToClean::default();

        for root in self.options.root_folders_to_clean() {
            if !root.is_dir() {
                trace!("Skipping missing root folder {}", root.display());
                continue;
            }

            let listing = match list_directory(root) {
                Ok(listing) => listing,
                Err(err) => {
                    warn!("Failed to list {}: {err}", root.display());
                    continue;
                }
            };

            for file in &listing.files {
                items.files.extend(self.claim(&self.file_cleaners, file));
            }

            for directory in &listing.directories {
                if self.options.is_ignored(directory) {
                    trace!("Ignoring directory {}", directory.display());
                    continue;
                }
                items
                    .directories
                    .extend(self.claim(&self.directory_cleaners, directory));
            }
        }

        items
    }

    fn claim(&self, cleaners: &[Rc<dyn ItemCleaner>], path: &Path) -> Option<ItemToClean> {
        match claim(cleaners, path) {
            Ok(item) => item,
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                None
            }
        }
    }
}

/// Logs a count and the paths for each cleaner type, in first-seen order.
fn log_found_items(items: &[ItemToClean]) {
    let mut groups: Vec<(CleanerType, Vec<&Path>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(kind, _)| *kind == item.cleaner_type()) {
            Some((_, paths)) => paths.push(item.path()),
            None => groups.push((item.cleaner_type(), vec![item.path()])),
        }
    }

    for (cleaner_type, paths) in groups {
        trace!("Found {} {} items to clean:", paths.len(), cleaner_type);
        for path in paths {
            trace!("\t{}", path.display());
        }
    }
}
