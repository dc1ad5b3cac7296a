//! Manual cleanup configuration loaded from a TOML file.
//!
//! ```toml
//! ignore = ["Games"]
//! remove_files = ["Visit our website.url"]
//!
//! [[remove_directories]]
//! name = "Contoso"
//! promote = ["Contoso.lnk", "Tools/Contoso Admin.lnk"]
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::CleanerError;

/// Case-insensitive lookup key for a file or directory name.
pub(crate) fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Normalizes a relative path to `/` separators without leading or trailing slashes.
pub(crate) fn relative_key(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualFileRemoveConfiguration {
    file_name: String,
}

impl ManualFileRemoveConfiguration {
    pub fn new(file_name: &str) -> Result<Self, CleanerError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(CleanerError::InvalidConfiguration(
                "file name cannot be empty".to_string(),
            ));
        }
        Ok(ManualFileRemoveConfiguration {
            file_name: file_name.to_string(),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualDirectoryRemoveConfiguration {
    directory_name: String,
    /// Relative paths, normalized by [`relative_key`].
    files_to_promote: HashSet<String>,
}

impl ManualDirectoryRemoveConfiguration {
    pub fn new<I, S>(directory_name: &str, files_to_promote: I) -> Result<Self, CleanerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let directory_name = directory_name.trim().trim_matches('/');
        if directory_name.is_empty() {
            return Err(CleanerError::InvalidConfiguration(
                "directory name cannot be empty".to_string(),
            ));
        }

        let files_to_promote = files_to_promote
            .into_iter()
            .map(|path| relative_key(path.as_ref()))
            .filter(|path| !path.is_empty())
            .collect();

        Ok(ManualDirectoryRemoveConfiguration {
            directory_name: directory_name.to_string(),
            files_to_promote,
        })
    }

    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }

    pub fn files_to_promote(&self) -> &HashSet<String> {
        &self.files_to_promote
    }

    /// Whether the file at `relative_path` (inside the directory) should be promoted.
    pub fn should_promote(&self, relative_path: &str) -> bool {
        self.files_to_promote.contains(&relative_key(relative_path))
    }
}

/// File configurations keyed by [`name_key`] of the file name.
pub type FileConfigurations = HashMap<String, ManualFileRemoveConfiguration>;

/// Directory configurations keyed by [`name_key`] of the directory name.
pub type DirectoryConfigurations = HashMap<String, ManualDirectoryRemoveConfiguration>;

/// Supplies explicit per-name cleanup overrides.
pub trait ManualConfigurationLoader {
    fn load_file_configurations(&self) -> FileConfigurations;

    fn load_directory_configurations(&self) -> DirectoryConfigurations;
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    remove_files: Vec<String>,
    #[serde(default)]
    remove_directories: Vec<DirectoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectoryEntry {
    name: String,
    #[serde(default)]
    promote: Vec<String>,
}

/// Validated contents of a configuration file.
#[derive(Debug, Default, Clone)]
pub struct CleanerConfig {
    folders_to_ignore: Vec<String>,
    files: FileConfigurations,
    directories: DirectoryConfigurations,
}

impl CleanerConfig {
    /// Location used when no configuration path is given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("startmenucleaner").join("config.toml"))
    }

    /// Load `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location yields an empty configuration;
    /// a missing explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_path(&default),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Failed to parse configuration")?;

        let mut files = FileConfigurations::new();
        for name in &file.remove_files {
            let configuration = ManualFileRemoveConfiguration::new(name)?;
            files.insert(name_key(configuration.file_name()), configuration);
        }

        let mut directories = DirectoryConfigurations::new();
        for entry in &file.remove_directories {
            let configuration = ManualDirectoryRemoveConfiguration::new(&entry.name, &entry.promote)?;
            directories.insert(name_key(configuration.directory_name()), configuration);
        }

        Ok(CleanerConfig {
            folders_to_ignore: file.ignore,
            files,
            directories,
        })
    }

    pub fn with_file(mut self, configuration: ManualFileRemoveConfiguration) -> Self {
        self.files
            .insert(name_key(configuration.file_name()), configuration);
        self
    }

    pub fn with_directory(mut self, configuration: ManualDirectoryRemoveConfiguration) -> Self {
        self.directories
            .insert(name_key(configuration.directory_name()), configuration);
        self
    }

    /// Folder names to ignore in addition to the built-in list.
    pub fn folders_to_ignore(&self) -> &[String] {
        &self.folders_to_ignore
    }
}

impl ManualConfigurationLoader for CleanerConfig {
    fn load_file_configurations(&self) -> FileConfigurations {
        self.files.clone()
    }

    fn load_directory_configurations(&self) -> DirectoryConfigurations {
        self.directories.clone()
    }
}
