use std::path::Path;
use std::rc::Rc;

use super::{invalid_operation, validate_file, CleanerType, ItemCleaner};
use crate::error::Result;
use crate::fs_ops::FileSystemOperationHandler;
use crate::shortcut::ShortcutHandler;

/// Deletes shortcuts whose target no longer exists.
///
/// A shortcut with an empty target is left alone: there is nothing to prove
/// it is broken.
pub struct BadShortcutFileCleaner {
    shortcuts: ShortcutHandler,
    operations: Rc<FileSystemOperationHandler>,
}

impl BadShortcutFileCleaner {
    pub fn new(shortcuts: ShortcutHandler, operations: Rc<FileSystemOperationHandler>) -> Self {
        BadShortcutFileCleaner {
            shortcuts,
            operations,
        }
    }
}

impl ItemCleaner for BadShortcutFileCleaner {
    fn cleaner_type(&self) -> CleanerType {
        CleanerType::BadShortcut
    }

    fn can_clean(&self, file_path: &Path) -> Result<bool> {
        validate_file(file_path)?;

        Ok(self.shortcuts.try_get_shortcut(file_path).is_some_and(|shortcut| {
            !shortcut.target_path().is_empty() && !Path::new(shortcut.target_path()).exists()
        }))
    }

    fn clean(&self, file_path: &Path) -> Result<()> {
        if !self.can_clean(file_path)? {
            return Err(invalid_operation(self.cleaner_type(), file_path));
        }

        self.operations.delete_file(file_path)
    }
}
