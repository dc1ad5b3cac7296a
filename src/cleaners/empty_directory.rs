use std::path::Path;
use std::rc::Rc;

use super::{invalid_operation, list_directory, validate_directory, CleanerType, ItemCleaner};
use crate::error::Result;
use crate::fs_ops::FileSystemOperationHandler;

/// Removes directories that contain nothing at all.
pub struct EmptyDirectoryCleaner {
    operations: Rc<FileSystemOperationHandler>,
}

impl EmptyDirectoryCleaner {
    pub fn new(operations: Rc<FileSystemOperationHandler>) -> Self {
        EmptyDirectoryCleaner { operations }
    }
}

impl ItemCleaner for EmptyDirectoryCleaner {
    fn cleaner_type(&self) -> CleanerType {
        CleanerType::EmptyDirectory
    }

    fn can_clean(&self, directory_path: &Path) -> Result<bool> {
        validate_directory(directory_path)?;
        Ok(list_directory(directory_path)?.is_empty())
    }

    fn clean(&self, directory_path: &Path) -> Result<()> {
        if !self.can_clean(directory_path)? {
            return Err(invalid_operation(self.cleaner_type(), directory_path));
        }

        self.operations.delete_directory(directory_path, false)
    }
}
