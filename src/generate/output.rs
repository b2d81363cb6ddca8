//! Collision-free output path resolution.

use std::path::{Path, PathBuf};

/// Resolve a path that does not collide with any file already on disk.
///
/// If nothing exists at `path`, it is returned unchanged. Otherwise a
/// disambiguating counter is inserted immediately before the final
/// extension — `name (1).ext`, `name (2).ext`, ... — incrementing until an
/// unused path is found. The check is made against the filesystem on every
/// call, so files created earlier in the same run are respected.
pub fn resolve_collision(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|s| s.to_string_lossy().into_owned());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut counter: u32 = 0;
    loop {
        counter += 1;
        let file_name = match &extension {
            Some(ext) => format!("{stem} ({counter}).{ext}"),
            None => format!("{stem} ({counter})"),
        };
        let candidate = parent.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_unused_path_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.docx");

        assert_eq!(resolve_collision(&path), path);
    }

    #[test]
    fn test_counter_inserted_before_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Bob.docx");
        fs::write(&path, b"first").unwrap();

        assert_eq!(resolve_collision(&path), dir.path().join("Bob (1).docx"));
    }

    #[test]
    fn test_counter_increments_past_existing_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Bob.docx");
        fs::write(&path, b"0").unwrap();
        fs::write(dir.path().join("Bob (1).docx"), b"1").unwrap();
        fs::write(dir.path().join("Bob (2).docx"), b"2").unwrap();

        assert_eq!(resolve_collision(&path), dir.path().join("Bob (3).docx"));
    }

    #[test]
    fn test_path_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes");
        fs::write(&path, b"x").unwrap();

        assert_eq!(resolve_collision(&path), dir.path().join("notes (1)"));
    }

    #[test]
    fn test_dotted_stem_keeps_inner_dots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.v2.docx");
        fs::write(&path, b"x").unwrap();

        assert_eq!(
            resolve_collision(&path),
            dir.path().join("report.v2 (1).docx")
        );
    }
}
