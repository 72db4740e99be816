//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
///
/// # Example
/// ```text
/// /home/user/site/src/styles/  ← start
/// /home/user/site/nestcss.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Normalize a path to absolute form.
///
/// Tries `canonicalize()` first; falls back to joining with `base`
/// when the path does not exist yet (e.g. an output directory).
pub fn normalize_path(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined.canonicalize().unwrap_or(joined)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_config_file_upward() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("nestcss.toml"), "").unwrap();
        let nested = root.join("src/styles");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_file(Path::new("nestcss.toml"), &nested).unwrap();
        assert_eq!(found, root.join("nestcss.toml"));
    }

    #[test]
    fn test_find_config_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(Path::new("no-such-config-4242.toml"), dir.path()).is_none());
    }

    #[test]
    fn test_normalize_path_nonexistent_relative() {
        let base = Path::new("/site");
        assert_eq!(
            normalize_path(Path::new("_site"), base),
            PathBuf::from("/site/_site")
        );
    }

    #[test]
    fn test_normalize_path_absolute_kept() {
        let path = Path::new("/definitely/not/here");
        assert_eq!(normalize_path(path, Path::new("/site")), path);
    }
}
