//! File copy primitive
//!
//! Copies preserve content, permission bits and modification time, and never
//! follow symbolic links: a link in the source is recreated as a link.

use crate::types::SyncError;
use filetime::FileTime;
use std::ffi::OsString;
use std::fs::{self, File, Metadata};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Copy `src` onto `dest` using the write-then-rename strategy
///
/// 1. Write to a fresh hidden sibling `.<name>.<random>.part` file
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename over the destination
///
/// The temporary file is created exclusively, so nothing already in the
/// directory is ever truncated. The parent directory of `dest` must already
/// exist. On failure the temporary file is removed and `dest` is left as it
/// was.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied (zero for symlinks)
/// * `Err(SyncError)` - IO error or other failure
///
/// # Example
/// ```no_run
/// use treesync::executor::copy_file_preserving;
/// use std::path::Path;
///
/// let bytes = copy_file_preserving(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), treesync::types::SyncError>(())
/// ```
pub fn copy_file_preserving(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    let src_metadata = fs::symlink_metadata(src).map_err(|e| SyncError::from_io(src, e))?;
    if src_metadata.file_type().is_symlink() {
        return copy_symlink(src, dest, &src_metadata);
    }

    // Dropping `part` on any early return deletes it
    let mut part = create_part_file(dest)?;
    let bytes = write_part(src, &mut part, &src_metadata)?;
    part.persist(dest)
        .map_err(|e| SyncError::from_io(dest, e.error))?;
    Ok(bytes)
}

fn write_part(
    src: &Path,
    part: &mut NamedTempFile,
    src_metadata: &Metadata,
) -> Result<u64, SyncError> {
    let part_path = part.path().to_path_buf();
    let mut src_file = File::open(src).map_err(|e| SyncError::from_io(src, e))?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| SyncError::from_io(src, e))?;
        if bytes_read == 0 {
            break;
        }

        part.as_file_mut()
            .write_all(&buffer[..bytes_read])
            .map_err(|e| SyncError::from_io(&part_path, e))?;
        total_bytes += bytes_read as u64;
    }

    let part_file = part.as_file();
    part_file
        .sync_all()
        .map_err(|e| SyncError::from_io(&part_path, e))?;
    part_file
        .set_permissions(src_metadata.permissions())
        .map_err(|e| SyncError::from_io(&part_path, e))?;
    filetime::set_file_handle_times(
        part_file,
        None,
        Some(FileTime::from_last_modification_time(src_metadata)),
    )
    .map_err(|e| SyncError::from_io(&part_path, e))?;

    Ok(total_bytes)
}

/// Exclusively create the temporary sibling that becomes `dest`.
fn create_part_file(dest: &Path) -> Result<NamedTempFile, SyncError> {
    let name = dest.file_name().ok_or_else(|| {
        SyncError::Validation(format!("Copy destination has no file name: {}", dest.display()))
    })?;
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut prefix = OsString::from(".");
    prefix.push(name);
    prefix.push(".");

    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|e| SyncError::from_io(dest, e))
}

/// Recreate a symlink at `dest` pointing where `src` points.
///
/// Whatever exists at `dest` is removed first.
fn copy_symlink(src: &Path, dest: &Path, src_metadata: &Metadata) -> Result<u64, SyncError> {
    let target = fs::read_link(src).map_err(|e| SyncError::from_io(src, e))?;

    if fs::symlink_metadata(dest).is_ok() {
        super::remove::remove_path_any(dest)?;
    }

    create_symlink(&target, dest)?;

    let mtime = FileTime::from_last_modification_time(src_metadata);
    filetime::set_symlink_file_times(dest, mtime, mtime)
        .map_err(|e| SyncError::from_io(dest, e))?;
    Ok(0)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link_path: &Path) -> Result<(), SyncError> {
    std::os::unix::fs::symlink(target, link_path).map_err(|e| SyncError::from_io(link_path, e))
}

#[cfg(windows)]
fn create_symlink(target: &Path, link_path: &Path) -> Result<(), SyncError> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    match symlink_file(target, link_path) {
        Ok(()) => Ok(()),
        Err(file_err) => match symlink_dir(target, link_path) {
            Ok(()) => Ok(()),
            Err(_) => Err(SyncError::from_io(link_path, file_err)),
        },
    }
}
