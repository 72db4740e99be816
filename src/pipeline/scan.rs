//! Content discovery.

use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ContentUnit, PipelineError};
use crate::debug;

const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Collect all files from a directory recursively, sorted by path.
///
/// Hidden entries and anything under `exclude` are skipped. A missing
/// directory or an unreadable entry fails the whole walk.
pub fn collect_all_files(dir: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>, PipelineError> {
    fs::metadata(dir).map_err(|e| PipelineError::Io(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).skip_hidden(true) {
        let entry = entry.map_err(|e| PipelineError::Walk(dir.to_path_buf(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or_default();
        if IGNORED_FILES.contains(&name) {
            continue;
        }
        let path = entry.path();
        if exclude.is_some_and(|skip| path.starts_with(skip)) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Read every text file under `dir` into a content unit.
///
/// Files that are not valid UTF-8 (images, fonts) are not content units
/// and are skipped.
pub fn collect_units(dir: &Path, exclude: Option<&Path>) -> Result<Vec<ContentUnit>, PipelineError> {
    let mut units = Vec::new();
    for path in collect_all_files(dir, exclude)? {
        let bytes = fs::read(&path).map_err(|e| PipelineError::Io(path.clone(), e))?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                let unit = ContentUnit::new(path, text);
                debug!("scan"; "{} [{}]", unit.path.display(), unit.kind.as_str());
                units.push(unit);
            }
            Err(_) => debug!("scan"; "skipping binary file {}", path.display()),
        }
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ContentType;

    #[test]
    fn test_collect_units_sorted_and_tagged() {
        // Default tempdir names start with a dot, which would count as hidden.
        let dir = tempfile::Builder::new().prefix("nestcss").tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("css/parts")).unwrap();
        fs::write(root.join("css/b.css"), ".b {}").unwrap();
        fs::write(root.join("css/a.css"), ".a {}").unwrap();
        fs::write(root.join("css/parts/c.css"), ".c {}").unwrap();
        fs::write(root.join("index.html"), "<p></p>").unwrap();
        fs::write(root.join(".hidden.css"), ".h {}").unwrap();
        fs::write(root.join(".DS_Store"), "x").unwrap();
        fs::write(root.join("logo.bin"), [0xffu8, 0xfe, 0x00]).unwrap();

        let units = collect_units(root, None).unwrap();
        let names: Vec<_> = units
            .iter()
            .map(|u| u.path.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("css/a.css"),
                PathBuf::from("css/b.css"),
                PathBuf::from("css/parts/c.css"),
                PathBuf::from("index.html"),
            ]
        );
        assert_eq!(units[0].kind, ContentType::Css);
        assert_eq!(units[3].kind, ContentType::Html);
        assert_eq!(units[1].text, ".b {}");
    }

    #[test]
    fn test_collect_missing_dir_fails() {
        let err = collect_all_files(Path::new("/no/such/dir/anywhere"), None).unwrap_err();
        assert!(matches!(err, PipelineError::Io(..)), "got: {err}");
    }

    #[test]
    fn test_collect_skips_excluded_dir() {
        let dir = tempfile::Builder::new().prefix("nestcss").tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("_site")).unwrap();
        fs::write(root.join("a.css"), ".a {}").unwrap();
        fs::write(root.join("_site/bundle.css"), ".a {}").unwrap();

        let files = collect_all_files(root, Some(root.join("_site").as_path())).unwrap();
        assert_eq!(files, vec![root.join("a.css")]);
    }
}
