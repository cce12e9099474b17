//! Repository State Inspector: live facts about the working tree.
//!
//! Policies see the repository only through [`RepoInspector`], so tests can
//! hand them a fixed [`RepositoryState`] instead of a real checkout.

/// `git` subprocess queries with a timeout.
pub mod git;
/// Path resolution and working-tree containment.
pub mod tree;

use std::path::{Path, PathBuf};

pub use git::GitInspector;

/// Source of repository state for policy evaluation.
///
/// Queries never fail: an unknown branch is `""` and an unknown status is an
/// empty list, which every policy treats as the permissive case.
pub trait RepoInspector {
    /// Short name of the checked-out branch, `""` when unknown or detached.
    fn current_branch(&self) -> String;

    /// Modified, staged or untracked files with a code extension.
    fn dirty_code_files(&self) -> Vec<String>;

    /// Directory relative paths are resolved against.
    fn working_dir(&self) -> &Path;

    fn path_is_inside_tracked_tree(&self, path: &str) -> bool {
        tree::inside_tracked_tree(path, self.working_dir())
    }

    fn path_is_inside_root(&self, path: &str, root: &str) -> bool {
        tree::inside_root(path, root, self.working_dir())
    }
}

/// A fixed snapshot of repository state.
///
/// Containment checks still consult the filesystem, anchored at
/// `working_dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryState {
    pub current_branch: String,
    pub dirty_code_files: Vec<String>,
    pub working_dir: PathBuf,
}

impl RepositoryState {
    /// Clean tree on `branch`, anchored at `/`.
    pub fn on_branch(branch: &str) -> Self {
        Self {
            current_branch: branch.to_string(),
            dirty_code_files: Vec::new(),
            working_dir: PathBuf::from("/"),
        }
    }

    pub fn with_dirty<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirty_code_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }
}

impl RepoInspector for RepositoryState {
    fn current_branch(&self) -> String {
        self.current_branch.clone()
    }

    fn dirty_code_files(&self) -> Vec<String> {
        self.dirty_code_files.clone()
    }

    fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}
