//! Filesystem helpers built on `cap-std` and `camino`.

use std::io;
use std::path::MAIN_SEPARATOR_STR;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Resolve an ambient directory for `path` and return it with the file name.
pub(crate) fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file.
pub(crate) fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Write `contents` to `path`, creating missing parent directories.
pub(crate) fn write_utf8_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    dir.write(name.as_str(), contents)
}

fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?.create_dir_all(&relative)
}

/// Split a parent path into an ambient base directory and a relative suffix.
fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    match parent.components().next() {
        Some(Utf8Component::Prefix(prefix)) => {
            let base = Utf8PathBuf::from(prefix.as_str()).join(MAIN_SEPARATOR_STR);
            let relative = parent
                .strip_prefix(&base)
                .or_else(|_| parent.strip_prefix(prefix.as_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            Ok((base, relative))
        }
        Some(Utf8Component::RootDir) => {
            let base = Utf8PathBuf::from(MAIN_SEPARATOR_STR);
            let relative = parent
                .strip_prefix(&base)
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            Ok((base, relative))
        }
        _ => Ok((Utf8PathBuf::from("."), parent.to_path_buf())),
    }
}
