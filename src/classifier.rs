//! Assigns a semantic category to a single Start Menu file.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::shortcut::{extension_of, FileShortcut, ShortcutHandler};

const APPREF_MS_EXTENSION: &str = "appref-ms";
const CHM_EXTENSION: &str = "chm";
const EXE_EXTENSION: &str = "exe";
const MSI_EXTENSION: &str = "msi";
const TXT_EXTENSION: &str = "txt";
const URL_EXTENSION: &str = "url";

const APP_EXTENSIONS: &[&str] = &[EXE_EXTENSION, APPREF_MS_EXTENSION];
const UNINSTALLER_EXTENSIONS: &[&str] = &[EXE_EXTENSION, MSI_EXTENSION];
const DELETABLE_EXTENSIONS: &[&str] = &[TXT_EXTENSION];

const UNINSTALL_KEYWORD: &str = "uninstall";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileClassification {
    App,
    Help,
    Uninstaller,
    WebLink,
    /// Known cruft that may be deleted without promotion.
    OtherDeletable,
    /// Anything unrecognized. Directories holding such a file are left alone.
    Other,
}

impl FileClassification {
    /// Whether a file of this kind may be deleted when its folder is cleaned up.
    pub fn is_removable(self) -> bool {
        !matches!(self, FileClassification::App | FileClassification::Other)
    }
}

impl fmt::Display for FileClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileClassification::App => "App",
            FileClassification::Help => "Help",
            FileClassification::Uninstaller => "Uninstaller",
            FileClassification::WebLink => "WebLink",
            FileClassification::OtherDeletable => "OtherDeletable",
            FileClassification::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A file path paired with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    pub path: PathBuf,
    pub classification: FileClassification,
}

pub struct FileClassifier {
    shortcuts: ShortcutHandler,
}

impl FileClassifier {
    pub fn new(shortcuts: ShortcutHandler) -> Self {
        FileClassifier { shortcuts }
    }

    /// Classify a file by its own extension and, for shortcuts, the target's.
    ///
    /// The rules are evaluated in a fixed order and the first match wins:
    /// uninstaller, app, web link, help, other-deletable, other. Uninstallers
    /// come first because their targets share the `.exe` extension with apps.
    pub fn classify(&self, file_path: &Path) -> FileClassification {
        let shortcut = self.shortcuts.try_get_shortcut(file_path);
        let own_ext = extension_of_path(file_path);
        let target_ext = shortcut
            .as_ref()
            .and_then(|s| extension_of(s.target_path()))
            .map(str::to_ascii_lowercase);
        let target_ext = target_ext.as_deref();

        if shortcut.as_ref().is_some_and(is_uninstaller_shortcut) {
            FileClassification::Uninstaller
        } else if target_ext.is_some_and(|ext| APP_EXTENSIONS.contains(&ext))
            || own_ext.as_deref() == Some(APPREF_MS_EXTENSION)
        {
            FileClassification::App
        } else if own_ext.as_deref() == Some(URL_EXTENSION) || target_ext == Some(URL_EXTENSION) {
            FileClassification::WebLink
        } else if target_ext == Some(CHM_EXTENSION) {
            FileClassification::Help
        } else if own_ext
            .as_deref()
            .is_some_and(|ext| DELETABLE_EXTENSIONS.contains(&ext))
            || target_ext.is_some_and(|ext| DELETABLE_EXTENSIONS.contains(&ext))
        {
            FileClassification::OtherDeletable
        } else {
            FileClassification::Other
        }
    }

    pub fn classify_all<I>(&self, file_paths: I) -> Vec<ClassifiedFile>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        file_paths
            .into_iter()
            .map(|path| {
                let classification = self.classify(&path);
                ClassifiedFile {
                    path,
                    classification,
                }
            })
            .collect()
    }
}

fn extension_of_path(path: &Path) -> Option<String> {
    extension_of(&path.to_string_lossy()).map(str::to_ascii_lowercase)
}

fn is_uninstaller_shortcut(shortcut: &FileShortcut) -> bool {
    let target_is_installer = extension_of(shortcut.target_path())
        .is_some_and(|ext| UNINSTALLER_EXTENSIONS.iter().any(|u| ext.eq_ignore_ascii_case(u)));

    let file_path = shortcut.file_path().to_string_lossy();
    target_is_installer && file_stem_of(&file_path).to_lowercase().contains(UNINSTALL_KEYWORD)
}

fn file_stem_of(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
