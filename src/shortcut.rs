//! File shortcuts and the capability used to resolve them.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

use anyhow::anyhow;

use crate::error::CleanerError;

const FRAGMENT_SEPARATOR: char = ';';

const LNK_EXTENSION: &str = "lnk";

/// Resolves the target of a shortcut file.
///
/// Implementations may fail for any reason (unsupported platform, malformed
/// file, ...). Callers in this crate treat a failure as "not a shortcut".
pub trait ShortcutResolver {
    fn resolve_target(&self, shortcut_path: &Path) -> anyhow::Result<String>;
}

/// A shortcut file and the path it points to.
///
/// Equality is case-insensitive on both paths. The text form is
/// `<path>.lnk;<target>`, accepted by [`FromStr`] and produced by [`Display`].
///
/// [`Display`]: fmt::Display
#[derive(Debug, Clone)]
pub struct FileShortcut {
    file_path: PathBuf,
    target_path: String,
}

impl FileShortcut {
    pub fn new(file_path: impl Into<PathBuf>, target_path: impl Into<String>) -> Self {
        FileShortcut {
            file_path: file_path.into(),
            target_path: target_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    /// Whether `value` looks like the `<path>.lnk;<target>` syntax.
    pub fn contains_shortcut_path_syntax(value: &str) -> bool {
        value.matches(FRAGMENT_SEPARATOR).count() == 1
            && value
                .to_lowercase()
                .contains(&format!(".{LNK_EXTENSION}{FRAGMENT_SEPARATOR}"))
    }

    fn folded(&self) -> (String, String) {
        (
            fold_path(&self.file_path),
            self.target_path.to_lowercase(),
        )
    }
}

impl FromStr for FileShortcut {
    type Err = CleanerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !Self::contains_shortcut_path_syntax(value) {
            return Err(CleanerError::InvalidShortcutSyntax(value.to_string()));
        }

        let fragments: Vec<&str> = value.split(FRAGMENT_SEPARATOR).map(str::trim).collect();
        let [path, target] = fragments.as_slice() else {
            return Err(CleanerError::InvalidShortcutSyntax(value.to_string()));
        };

        if !has_extension(path, LNK_EXTENSION) {
            return Err(CleanerError::InvalidShortcutSyntax(format!(
                "{value} (the path is not a .lnk file)"
            )));
        }

        Ok(FileShortcut::new(*path, *target))
    }
}

impl fmt::Display for FileShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.file_path.display(),
            FRAGMENT_SEPARATOR,
            self.target_path
        )
    }
}

impl PartialEq for FileShortcut {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl Eq for FileShortcut {}

impl Hash for FileShortcut {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

/// Extension of the last path segment, splitting on both `/` and `\` so that
/// Windows-style targets behave the same on every host.
pub(crate) fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(ext),
        _ => None,
    }
}

pub(crate) fn has_extension(path: &str, extension: &str) -> bool {
    extension_of(path).is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Looks up shortcut targets through a [`ShortcutResolver`].
#[derive(Clone)]
pub struct ShortcutHandler {
    resolver: Rc<dyn ShortcutResolver>,
}

impl ShortcutHandler {
    pub fn new(resolver: Rc<dyn ShortcutResolver>) -> Self {
        ShortcutHandler { resolver }
    }

    pub fn is_shortcut(file_path: &Path) -> bool {
        has_extension(&file_path.to_string_lossy(), LNK_EXTENSION)
    }

    /// Resolve `file_path` as a shortcut; `None` if it isn't one or resolution fails.
    pub fn try_get_shortcut(&self, file_path: &Path) -> Option<FileShortcut> {
        if !Self::is_shortcut(file_path) {
            return None;
        }

        match self.resolver.resolve_target(file_path) {
            Ok(target) => Some(FileShortcut::new(file_path, target)),
            Err(err) => {
                tracing::trace!("Unable to resolve shortcut {}: {err:#}", file_path.display());
                None
            }
        }
    }

    pub fn get_shortcut(&self, file_path: &Path) -> anyhow::Result<FileShortcut> {
        self.try_get_shortcut(file_path)
            .ok_or_else(|| anyhow!("not a valid file shortcut: {}", file_path.display()))
    }
}

/// Resolves shortcuts from a fixed table instead of reading shortcut files.
#[derive(Debug, Default, Clone)]
pub struct InMemoryShortcutResolver {
    targets: HashMap<String, String>,
}

impl InMemoryShortcutResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shortcut: &FileShortcut) {
        self.insert(shortcut.file_path(), shortcut.target_path());
    }

    pub fn insert(&mut self, shortcut_path: &Path, target: &str) {
        self.targets
            .insert(fold_path(shortcut_path), target.to_string());
    }
}

impl ShortcutResolver for InMemoryShortcutResolver {
    fn resolve_target(&self, shortcut_path: &Path) -> anyhow::Result<String> {
        self.targets
            .get(&fold_path(shortcut_path))
            .cloned()
            .ok_or_else(|| anyhow!("Unable to resolve shortcut."))
    }
}

fn fold_path(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
