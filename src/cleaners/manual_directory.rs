use std::path::Path;
use std::rc::Rc;

use walkdir::WalkDir;

use super::{invalid_operation, parent_directory, validate_directory, CleanerType, ItemCleaner};
use crate::config::{
    name_key, DirectoryConfigurations, ManualConfigurationLoader, ManualDirectoryRemoveConfiguration,
};
use crate::error::{CleanerError, Result};
use crate::fs_ops::FileSystemOperationHandler;

/// Removes directories listed by name in the manual configuration,
/// promoting the configured files to the parent directory first.
pub struct ManualConfigurationDirectoryCleaner {
    configurations: DirectoryConfigurations,
    operations: Rc<FileSystemOperationHandler>,
}

impl ManualConfigurationDirectoryCleaner {
    pub fn new(
        loader: &dyn ManualConfigurationLoader,
        operations: Rc<FileSystemOperationHandler>,
    ) -> Self {
        ManualConfigurationDirectoryCleaner {
            configurations: loader.load_directory_configurations(),
            operations,
        }
    }

    fn configuration_for(
        &self,
        directory_path: &Path,
    ) -> Result<Option<&ManualDirectoryRemoveConfiguration>> {
        validate_directory(directory_path)?;

        Ok(directory_path
            .file_name()
            .and_then(|name| self.configurations.get(&name_key(&name.to_string_lossy()))))
    }
}

impl ItemCleaner for ManualConfigurationDirectoryCleaner {
    fn cleaner_type(&self) -> CleanerType {
        CleanerType::ManualConfiguration
    }

    fn can_clean(&self, directory_path: &Path) -> Result<bool> {
        Ok(self.configuration_for(directory_path)?.is_some())
    }

    fn clean(&self, directory_path: &Path) -> Result<()> {
        let configuration = self
            .configuration_for(directory_path)?
            .ok_or_else(|| invalid_operation(self.cleaner_type(), directory_path))?;

        let parent = parent_directory(directory_path)?;

        let mut files_to_promote = Vec::new();
        for entry in WalkDir::new(directory_path).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(directory_path).to_path_buf();
                CleanerError::io(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(directory_path) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if configuration.should_promote(&relative) {
                files_to_promote.push(entry.into_path());
            }
        }

        self.operations
            .move_files_to_directory(parent, &files_to_promote, true)?;
        self.operations.delete_directory(directory_path, true)
    }
}
