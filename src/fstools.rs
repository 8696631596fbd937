use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub enum DirEntryCategory {
    DoesNotExist,
    RegularFile,
    SymbolicLink,
    Directory,
    Unknown,
}

pub fn classify_file(path: &Path) -> DirEntryCategory {
    match fs::symlink_metadata(path) {
        Ok(metadata) => {
            if metadata.is_symlink() {
                DirEntryCategory::SymbolicLink
            } else if metadata.is_file() {
                DirEntryCategory::RegularFile
            } else if metadata.is_dir() {
                DirEntryCategory::Directory
            } else {
                DirEntryCategory::Unknown
            }
        },
        Err(_) => DirEntryCategory::DoesNotExist,
    }
}

/// True when `path` resolves to a regular file this process can open for reading.
/// Symlinks are followed.
pub fn is_readable_file(path: &Path) -> bool {
    let target = match classify_file(path) {
        DirEntryCategory::RegularFile => path.to_path_buf(),
        DirEntryCategory::SymbolicLink => match fs::canonicalize(path) {
            Ok(resolved) => resolved,
            Err(_) => return false,
        },
        _ => return false,
    };

    match classify_file(&target) {
        DirEntryCategory::RegularFile => File::open(&target).is_ok(),
        _ => false,
    }
}

pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `<dir>/<stem>.webm` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("webm")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_output_path() {
        assert_eq!(default_output_path(Path::new("/foo/bar/baz.mkv")), PathBuf::from("/foo/bar/baz.webm"));
        assert_eq!(default_output_path(Path::new("bar/baz.tar.mp4")), PathBuf::from("bar/baz.tar.webm"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Path::new("/a/b.MP4")), "MP4");
        assert_eq!(file_extension(Path::new("/a/noext")), "");
    }

    #[test]
    fn test_is_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("clip.mp4");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"data").unwrap();

        assert!(is_readable_file(&file_path));
        assert!(!is_readable_file(dir.path()));
        assert!(!is_readable_file(&dir.path().join("missing.mp4")));
    }
}
