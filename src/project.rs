//! Project root discovery.
//!
//! The key store and export script live at fixed locations relative to the
//! project root. The root is resolved once at startup and passed down
//! explicitly.

use std::path::{Path, PathBuf};

use crate::constants::{ENV_PROJECT_ROOT, WORKSPACE_MARKER};
use crate::env::Env;

/// Find the nearest ancestor of `start` (inclusive) containing a `.west` directory.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(WORKSPACE_MARKER).is_dir())
        .map(Path::to_path_buf)
}

/// Resolve the project root.
///
/// Tries, in order:
/// 1. The explicit `--project-root` value
/// 2. `DEVKEYS_PROJECT_ROOT`
/// 3. The enclosing west workspace of `cwd`
/// 4. `cwd` itself
///
/// Relative overrides are resolved against `cwd`.
pub fn resolve_project_root(explicit: Option<&Path>, env: &Env, cwd: &Path) -> PathBuf {
    if let Some(root) = explicit {
        return cwd.join(root);
    }
    if let Some(root) = env.path(ENV_PROJECT_ROOT) {
        return cwd.join(root);
    }
    find_workspace_root(cwd).unwrap_or_else(|| cwd.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Env {
        Env::mock(Vec::<(&str, &str)>::new())
    }

    #[test]
    fn finds_marker_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".west")).unwrap();
        let nested = dir.path().join("app").join("src");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_workspace_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn marker_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".west"), "").unwrap();
        let found = find_workspace_root(dir.path());
        assert_ne!(found, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn explicit_root_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".west")).unwrap();
        let env = Env::mock([(ENV_PROJECT_ROOT, "/from/env")]);

        let root = resolve_project_root(Some(Path::new("/explicit")), &env, dir.path());
        assert_eq!(root, PathBuf::from("/explicit"));
    }

    #[test]
    fn env_root_beats_workspace_discovery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".west")).unwrap();
        let env = Env::mock([(ENV_PROJECT_ROOT, "/from/env")]);

        let root = resolve_project_root(None, &env, dir.path());
        assert_eq!(root, PathBuf::from("/from/env"));
    }

    #[test]
    fn relative_override_is_joined_to_cwd() {
        let root = resolve_project_root(Some(Path::new("fw")), &no_env(), Path::new("/work"));
        assert_eq!(root, PathBuf::from("/work/fw"));
    }

    #[test]
    fn falls_back_to_enclosing_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("app");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir(dir.path().join(".west")).unwrap();
        assert_eq!(resolve_project_root(None, &no_env(), &nested), dir.path());
    }

    #[test]
    fn falls_back_to_cwd_without_workspace() {
        let cwd = Path::new("/devkeys-no-such-dir/app");
        assert_eq!(resolve_project_root(None, &no_env(), cwd), cwd);
    }
}
