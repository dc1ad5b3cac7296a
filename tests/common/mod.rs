#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use startmenu_cleaner::{
    Cleaner, CleanerConfig, CleanerOptions, FileShortcut, InMemoryShortcutResolver,
};
use tempfile::TempDir;

/// A Start Menu tree on disk plus the targets its shortcuts resolve to.
///
/// Shortcuts are plain files whose targets live in the in-memory resolver.
/// Targets are created under a separate "program files" directory so root
/// level shortcuts are not mistaken for broken ones.
pub struct TestTree {
    root: TempDir,
    programs: TempDir,
    resolver: InMemoryShortcutResolver,
}

impl TestTree {
    pub fn new() -> Self {
        TestTree {
            root: tempfile::tempdir().unwrap(),
            programs: tempfile::tempdir().unwrap(),
            resolver: InMemoryShortcutResolver::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Adds a shortcut at `relative` pointing at an existing program file named `target`.
    pub fn shortcut(self, relative: &str, target: &str) -> Self {
        let target_path = self.programs.path().join(target);
        fs::write(&target_path, "").unwrap();
        self.link(relative, &target_path.to_string_lossy())
    }

    /// Adds a shortcut whose target does not exist.
    pub fn broken_shortcut(self, relative: &str, target: &str) -> Self {
        let target_path = self.programs.path().join("missing").join(target);
        self.link(relative, &target_path.to_string_lossy())
    }

    /// Adds a shortcut at `relative` resolving to `target` verbatim.
    pub fn link(mut self, relative: &str, target: &str) -> Self {
        let path = self.write(relative);
        self.resolver.add(&FileShortcut::new(path, target));
        self
    }

    /// Adds a plain file.
    pub fn file(mut self, relative: &str) -> Self {
        self.write(relative);
        self
    }

    pub fn dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    fn write(&mut self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, relative).unwrap();
        path
    }

    /// Every file and directory below the root, relative and `/`-separated, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = walkdir::WalkDir::new(self.root())
            .min_depth(1)
            .into_iter()
            .map(|entry| {
                let entry = entry.unwrap();
                let relative = entry.path().strip_prefix(self.root()).unwrap();
                let mut name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                if entry.file_type().is_dir() {
                    name.push('/');
                }
                name
            })
            .collect();
        entries.sort();
        entries
    }

    pub fn options(&self) -> CleanerOptions {
        CleanerOptions::new(vec![self.root().to_path_buf()])
    }

    pub fn resolver(&self) -> Rc<InMemoryShortcutResolver> {
        Rc::new(self.resolver.clone())
    }

    /// A cleaner using the default strategies and this tree's shortcuts.
    pub fn cleaner(&self, options: CleanerOptions, config: &CleanerConfig) -> Cleaner {
        Cleaner::with_default_cleaners(options, self.resolver(), config)
    }
}
