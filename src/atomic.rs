use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::FreqError;

/// Sibling path a file is staged under until it is complete.
pub fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".partial");
    target.with_file_name(name)
}

/// Runs `body` against a buffered writer on `<target>.partial`, then renames
/// the finished file onto `target`. On any failure the partial file is
/// removed and `target` is left as it was.
pub fn write_atomically<T, F>(target: &Path, body: F) -> Result<T, FreqError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T, FreqError>,
{
    let staging = partial_path(target);
    let result = stage(&staging, body).and_then(|value| {
        fs::rename(&staging, target).map_err(|e| FreqError::io(target, e))?;
        Ok(value)
    });
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

fn stage<T, F>(staging: &Path, body: F) -> Result<T, FreqError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T, FreqError>,
{
    let file = File::create(staging).map_err(|e| FreqError::io(staging, e))?;
    let mut writer = BufWriter::new(file);
    let value = body(&mut writer)?;
    writer.flush().map_err(|e| FreqError::io(staging, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FreqError::io(staging, e))?;
    Ok(value)
}
