use std::path::Path;
use std::rc::Rc;

use super::{
    invalid_operation, list_directory, parent_directory, validate_directory, CleanerType,
    ItemCleaner,
};
use crate::classifier::{ClassifiedFile, FileClassification, FileClassifier};
use crate::error::Result;
use crate::fs_ops::FileSystemOperationHandler;

/// Directories with more app shortcuts than this are left intact.
pub const MAX_APPS: usize = 2;

/// Flattens a directory with a few apps plus removable cruft.
///
/// App shortcuts are promoted to the parent directory; help files,
/// uninstallers, web links and text files are deleted along with the folder.
pub struct FewAppsWithCruftDirectoryCleaner {
    classifier: Rc<FileClassifier>,
    operations: Rc<FileSystemOperationHandler>,
}

impl FewAppsWithCruftDirectoryCleaner {
    pub fn new(classifier: Rc<FileClassifier>, operations: Rc<FileSystemOperationHandler>) -> Self {
        FewAppsWithCruftDirectoryCleaner {
            classifier,
            operations,
        }
    }

    /// Classified files of the directory, or `None` if it has subdirectories.
    fn classify_contents(&self, directory_path: &Path) -> Result<Option<Vec<ClassifiedFile>>> {
        let listing = list_directory(directory_path)?;
        if !listing.directories.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.classifier.classify_all(listing.files)))
    }
}

fn qualifies(files: &[ClassifiedFile]) -> bool {
    // Unknown files can't be cleaned up safely.
    if files
        .iter()
        .any(|f| f.classification == FileClassification::Other)
    {
        return false;
    }

    let app_count = files
        .iter()
        .filter(|f| f.classification == FileClassification::App)
        .count();
    if app_count > MAX_APPS {
        return false;
    }

    files
        .iter()
        .filter(|f| f.classification != FileClassification::App)
        .all(|f| f.classification.is_removable())
}

impl ItemCleaner for FewAppsWithCruftDirectoryCleaner {
    fn cleaner_type(&self) -> CleanerType {
        CleanerType::FewAppsWithCruftDirectory
    }

    fn can_clean(&self, directory_path: &Path) -> Result<bool> {
        validate_directory(directory_path)?;

        Ok(self
            .classify_contents(directory_path)?
            .is_some_and(|files| qualifies(&files)))
    }

    fn clean(&self, directory_path: &Path) -> Result<()> {
        validate_directory(directory_path)?;

        let files = match self.classify_contents(directory_path)? {
            Some(files) if qualifies(&files) => files,
            _ => return Err(invalid_operation(self.cleaner_type(), directory_path)),
        };

        let parent = parent_directory(directory_path)?;
        let (apps, cruft): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|f| f.classification == FileClassification::App);

        self.operations
            .move_files_to_directory(parent, apps.iter().map(|f| &f.path), true)?;
        self.operations
            .delete_files(cruft.iter().map(|f| &f.path))?;
        self.operations.delete_directory(directory_path, false)
    }
}
