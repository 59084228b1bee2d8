//! Read-only filesystem helpers built on `cap-std` and `camino`.
//!
//! The CLI loads request bodies and solstice tables through these helpers so
//! every file access goes through a capability handle on the parent directory.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Read};

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
/// Returns the underlying I/O error when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole UTF-8 text file.
///
/// # Errors
/// Returns the underlying I/O error when the file cannot be opened or read,
/// including [`io::ErrorKind::InvalidData`] for non-UTF-8 content.
pub fn read_utf8_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Open the parent directory of `path` and return it with the file name.
///
/// # Errors
/// Fails when `path` has no file name or the parent directory cannot be
/// opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether `path` exists and is a regular file.
///
/// # Errors
/// Returns [`io::ErrorKind::NotFound`] when the path or its parent does not
/// exist, and other I/O errors when it cannot be inspected.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Workspace { _dir: dir, root }
    }

    #[rstest]
    fn reads_text_files(workspace: Workspace) {
        let path = workspace.root.join("request.json");
        std::fs::write(&path, "{\"birthYear\": 1990}").expect("write file");

        let contents = read_utf8_to_string(&path).expect("file should be readable");

        assert_eq!(contents, "{\"birthYear\": 1990}");
    }

    #[rstest]
    fn distinguishes_files_from_directories(workspace: Workspace) {
        let file = workspace.root.join("solstices.json");
        std::fs::write(&file, "{}").expect("write file");
        let dir = workspace.root.join("nested");
        std::fs::create_dir(&dir).expect("create dir");

        assert!(file_is_file(&file).expect("inspect file"));
        assert!(!file_is_file(&dir).expect("inspect dir"));
    }

    #[rstest]
    fn missing_files_report_not_found(workspace: Workspace) {
        let path = workspace.root.join("absent.json");

        let err = file_is_file(&path).expect_err("missing file should fail");

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn bare_file_names_resolve_against_current_dir() {
        let (_, name) = open_dir_and_file(Utf8Path::new("Cargo.toml")).expect("crate dir opens");
        assert_eq!(name, "Cargo.toml");
    }
}
