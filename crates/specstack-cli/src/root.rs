use specstack_core::paths::{self, Roots};
use specstack_core::SpecstackError;
use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `SPECSTACK_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.specstack/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    find_upward(&cwd, paths::SPECSTACK_DIR)
        .or_else(|| find_upward(&cwd, ".git"))
        .unwrap_or(cwd)
}

fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

/// Resolve the home root: `--home` / `SPECSTACK_HOME`, else the user's home directory.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf, SpecstackError> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => home::home_dir().ok_or(SpecstackError::HomeNotFound),
    }
}

pub fn roots(project: &Path, home: Option<&Path>) -> Result<Roots, SpecstackError> {
    Ok(Roots::new(project, resolve_home(home)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn find_upward_locates_marker_in_ancestor() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".specstack")).unwrap();
        let deep = dir.path().join("src/deep");
        std::fs::create_dir_all(&deep).unwrap();

        assert_eq!(
            find_upward(&deep, ".specstack"),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn explicit_home_wins() {
        let dir = TempDir::new().unwrap();
        let roots = roots(Path::new("/proj"), Some(dir.path())).unwrap();
        assert_eq!(roots.home, dir.path());
        assert_eq!(roots.project, PathBuf::from("/proj"));
    }
}
