//! Filesystem mutations with simulate (dry-run) support.
//!
//! Every operation is logged and recorded the same way whether or not the
//! handler is simulating, so a dry run reports exactly what a real run does.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CleanerError, Result};

/// A filesystem action performed (or simulated) by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    DeleteDirectory { path: PathBuf, recursive: bool },
    DeleteFile { path: PathBuf },
    MoveFile { from: PathBuf, to: PathBuf },
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOperation::DeleteDirectory { path, .. } => {
                write!(f, "Deleted directory: \"{}\"", file_name(path))
            }
            FileOperation::DeleteFile { path } => write!(f, "Deleted file: \"{}\"", file_name(path)),
            FileOperation::MoveFile { from, to } => {
                write!(f, "Moved file: \"{}\" to \"{}\"", file_name(from), to.display())
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Default)]
pub struct FileSystemOperationHandler {
    simulate: bool,
    operations: RefCell<Vec<FileOperation>>,
}

impl FileSystemOperationHandler {
    pub fn new(simulate: bool) -> Self {
        FileSystemOperationHandler {
            simulate,
            operations: RefCell::new(Vec::new()),
        }
    }

    pub fn is_simulate(&self) -> bool {
        self.simulate
    }

    /// Operations recorded so far, in execution order.
    pub fn operations(&self) -> Vec<FileOperation> {
        self.operations_since(0)
    }

    pub fn operation_count(&self) -> usize {
        self.operations.borrow().len()
    }

    /// Operations recorded after the first `start` ones.
    pub fn operations_since(&self, start: usize) -> Vec<FileOperation> {
        self.operations
            .borrow()
            .get(start..)
            .map(<[FileOperation]>::to_vec)
            .unwrap_or_default()
    }

    pub fn delete_directory(&self, directory_path: &Path, recursive: bool) -> Result<()> {
        if !self.simulate {
            let result = if recursive {
                fs::remove_dir_all(directory_path)
            } else {
                fs::remove_dir(directory_path)
            };
            result.map_err(|err| CleanerError::io(directory_path, err))?;
        }

        self.record(FileOperation::DeleteDirectory {
            path: directory_path.to_path_buf(),
            recursive,
        });
        Ok(())
    }

    /// Delete a file. Does nothing if the file does not exist.
    pub fn delete_file(&self, file_path: &Path) -> Result<()> {
        if !file_path.is_file() {
            return Ok(());
        }

        if !self.simulate {
            fs::remove_file(file_path).map_err(|err| CleanerError::io(file_path, err))?;
        }

        self.record(FileOperation::DeleteFile {
            path: file_path.to_path_buf(),
        });
        Ok(())
    }

    pub fn delete_files<I, P>(&self, file_paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for file_path in file_paths {
            self.delete_file(file_path.as_ref())?;
        }
        Ok(())
    }

    /// Move a file into `new_directory`, keeping its name. Returns the new location.
    ///
    /// With `replace_existing`, a file already at the destination is removed
    /// as part of the move; otherwise an existing destination is an error.
    pub fn move_file_to_directory(
        &self,
        new_directory: &Path,
        current_file_location: &Path,
        replace_existing: bool,
    ) -> Result<PathBuf> {
        let name = current_file_location
            .file_name()
            .ok_or_else(|| CleanerError::FileNotFound(current_file_location.to_path_buf()))?;
        let new_file_location = new_directory.join(name);

        let destination_exists = new_file_location.exists();
        if destination_exists && !replace_existing {
            return Err(CleanerError::DestinationExists(new_file_location));
        }

        if !self.simulate {
            if destination_exists {
                fs::remove_file(&new_file_location)
                    .map_err(|err| CleanerError::io(&new_file_location, err))?;
            }
            fs::rename(current_file_location, &new_file_location)
                .map_err(|err| CleanerError::io(current_file_location, err))?;
        }

        self.record(FileOperation::MoveFile {
            from: current_file_location.to_path_buf(),
            to: new_file_location.clone(),
        });
        Ok(new_file_location)
    }

    pub fn move_files_to_directory<I, P>(
        &self,
        new_directory: &Path,
        current_file_locations: I,
        replace_existing: bool,
    ) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for location in current_file_locations {
            self.move_file_to_directory(new_directory, location.as_ref(), replace_existing)?;
        }
        Ok(())
    }

    fn record(&self, operation: FileOperation) {
        debug!("{operation}");
        self.operations.borrow_mut().push(operation);
    }
}
