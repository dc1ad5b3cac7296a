use std::path::Path;
use std::rc::Rc;

use super::{
    invalid_operation, list_directory, parent_directory, validate_directory, CleanerType,
    ItemCleaner,
};
use crate::classifier::{FileClassification, FileClassifier};
use crate::error::Result;
use crate::fs_ops::FileSystemOperationHandler;

/// Flattens a directory holding nothing but one app shortcut.
///
/// The shortcut moves up into the parent directory and the folder is removed.
pub struct SingleAppDirectoryCleaner {
    classifier: Rc<FileClassifier>,
    operations: Rc<FileSystemOperationHandler>,
}

impl SingleAppDirectoryCleaner {
    pub fn new(classifier: Rc<FileClassifier>, operations: Rc<FileSystemOperationHandler>) -> Self {
        SingleAppDirectoryCleaner {
            classifier,
            operations,
        }
    }
}

impl ItemCleaner for SingleAppDirectoryCleaner {
    fn cleaner_type(&self) -> CleanerType {
        CleanerType::SingleAppDirectory
    }

    fn can_clean(&self, directory_path: &Path) -> Result<bool> {
        validate_directory(directory_path)?;

        let listing = list_directory(directory_path)?;
        if !listing.directories.is_empty() {
            return Ok(false);
        }

        Ok(match listing.files.as_slice() {
            [file] => self.classifier.classify(file) == FileClassification::App,
            _ => false,
        })
    }

    fn clean(&self, directory_path: &Path) -> Result<()> {
        if !self.can_clean(directory_path)? {
            return Err(invalid_operation(self.cleaner_type(), directory_path));
        }

        let parent = parent_directory(directory_path)?;
        let listing = list_directory(directory_path)?;

        self.operations
            .move_files_to_directory(parent, &listing.files, true)?;
        self.operations.delete_directory(directory_path, false)
    }
}
