//! Filesystem containment checks for deletion targets.

use std::path::{Component, Path, PathBuf};

/// Marker whose presence in an ancestor makes a directory a git working
/// tree. A file (worktrees, submodules) counts as well as a directory.
const VCS_MARKER: &str = ".git";

/// Expand `~` and `$VARS`, anchor relative paths at `cwd`, and resolve
/// symlinks for the longest prefix that exists.
///
/// `None` when expansion fails (an unset variable): the path cannot be known.
pub fn resolve_path(raw: &str, cwd: &Path) -> Option<PathBuf> {
    let expanded = shellexpand::full(raw).ok()?;
    let path = Path::new(expanded.as_ref());
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    Some(canonicalize_lenient(&absolute))
}

/// `canonicalize` that tolerates missing tails: the longest existing
/// prefix is resolved, the rest is appended lexically.
fn canonicalize_lenient(path: &Path) -> PathBuf {
    let components: Vec<Component> = path.components().collect();
    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        if let Ok(mut resolved) = prefix.canonicalize() {
            push_lexical(&mut resolved, &components[split..]);
            return resolved;
        }
    }
    let mut lexical = PathBuf::new();
    push_lexical(&mut lexical, &components);
    lexical
}

fn push_lexical(base: &mut PathBuf, rest: &[Component]) {
    for component in rest {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            other => base.push(other.as_os_str()),
        }
    }
}

/// True when `raw` lies inside a git working tree.
///
/// Walks from the path (or its parent, for non-directories) towards the
/// root; the root itself is not checked. An empty path is treated as inside.
pub fn inside_tracked_tree(raw: &str, cwd: &Path) -> bool {
    if raw.is_empty() {
        return true;
    }
    let Some(resolved) = resolve_path(raw, cwd) else {
        return false;
    };

    let mut current = if resolved.is_dir() {
        resolved.as_path()
    } else {
        resolved.parent().unwrap_or(resolved.as_path())
    };
    while let Some(parent) = current.parent() {
        if current.join(VCS_MARKER).exists() {
            return true;
        }
        current = parent;
    }
    false
}

/// True when `raw` resolves to `root` or something beneath it.
/// An empty root allows nothing.
pub fn inside_root(raw: &str, root: &str, cwd: &Path) -> bool {
    if raw.is_empty() {
        return true;
    }
    if root.is_empty() {
        return false;
    }
    match (resolve_path(raw, cwd), resolve_path(root, cwd)) {
        (Some(path), Some(root)) => path.starts_with(root),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// `<tmp>/repo/.git/`, `<tmp>/repo/src/`, `<tmp>/outside/`.
    fn layout() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("repo/.git")).unwrap();
        fs::create_dir_all(tmp.path().join("repo/src")).unwrap();
        fs::write(tmp.path().join("repo/src/lib.rs"), "").unwrap();
        fs::create_dir_all(tmp.path().join("outside")).unwrap();
        tmp
    }

    #[test]
    fn empty_path_is_inside() {
        assert!(inside_tracked_tree("", Path::new("/")));
    }

    #[test]
    fn file_inside_repo() {
        let tmp = layout();
        let cwd = tmp.path().join("repo");
        assert!(inside_tracked_tree("src/lib.rs", &cwd));
        assert!(inside_tracked_tree("src", &cwd));
        assert!(inside_tracked_tree(".", &cwd));
    }

    #[test]
    fn missing_file_inside_repo() {
        let tmp = layout();
        let cwd = tmp.path().join("repo");
        assert!(inside_tracked_tree("build/not/yet/there", &cwd));
    }

    #[test]
    fn path_outside_repo() {
        let tmp = layout();
        let cwd = tmp.path().join("repo");
        let outside = tmp.path().join("outside");
        assert!(!inside_tracked_tree(outside.to_str().unwrap(), &cwd));
        assert!(!inside_tracked_tree("../outside", &cwd));
    }

    #[test]
    fn parent_traversal_escapes_repo() {
        let tmp = layout();
        let cwd = tmp.path().join("repo");
        assert!(!inside_tracked_tree("src/../../outside/x", &cwd));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_into_outside_is_resolved() {
        let tmp = layout();
        let cwd = tmp.path().join("repo");
        std::os::unix::fs::symlink(tmp.path().join("outside"), cwd.join("escape")).unwrap();
        assert!(!inside_tracked_tree("escape", &cwd));
    }

    #[test]
    fn git_file_marker_counts() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("wt/sub")).unwrap();
        fs::write(tmp.path().join("wt/.git"), "gitdir: /elsewhere").unwrap();
        assert!(inside_tracked_tree("sub", &tmp.path().join("wt")));
    }

    #[test]
    fn unset_variable_is_unknown() {
        assert!(resolve_path("$CC_GUARDRAILS_SURELY_UNSET_VAR/x", Path::new("/")).is_none());
        assert!(!inside_tracked_tree(
            "$CC_GUARDRAILS_SURELY_UNSET_VAR/x",
            Path::new("/")
        ));
    }

    #[test]
    fn root_containment() {
        let tmp = layout();
        let root = tmp.path().join("repo");
        let root_str = root.to_str().unwrap();
        assert!(inside_root("src/lib.rs", root_str, &root));
        assert!(inside_root(root_str, root_str, &root));
        assert!(!inside_root("../outside", root_str, &root));
        assert!(!inside_root("src", "", &root));
    }
}
