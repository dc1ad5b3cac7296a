use std::path::Path;
use std::rc::Rc;

use super::{invalid_operation, validate_file, CleanerType, ItemCleaner};
use crate::config::{name_key, FileConfigurations, ManualConfigurationLoader};
use crate::error::Result;
use crate::fs_ops::FileSystemOperationHandler;

/// Deletes files listed by name in the manual configuration.
pub struct ManualConfigurationFileCleaner {
    configurations: FileConfigurations,
    operations: Rc<FileSystemOperationHandler>,
}

impl ManualConfigurationFileCleaner {
    pub fn new(
        loader: &dyn ManualConfigurationLoader,
        operations: Rc<FileSystemOperationHandler>,
    ) -> Self {
        ManualConfigurationFileCleaner {
            configurations: loader.load_file_configurations(),
            operations,
        }
    }
}

impl ItemCleaner for ManualConfigurationFileCleaner {
    fn cleaner_type(&self) -> CleanerType {
        CleanerType::ManualConfiguration
    }

    fn can_clean(&self, file_path: &Path) -> Result<bool> {
        validate_file(file_path)?;

        Ok(file_path.file_name().is_some_and(|name| {
            self.configurations
                .contains_key(&name_key(&name.to_string_lossy()))
        }))
    }

    fn clean(&self, file_path: &Path) -> Result<()> {
        if !self.can_clean(file_path)? {
            return Err(invalid_operation(self.cleaner_type(), file_path));
        }

        self.operations.delete_file(file_path)
    }
}
