//! File I/O utilities with atomic writes
//!
//! Every file this crate produces (ledger, settings, reports) goes through
//! `write_bytes_atomic`, so a failed write never leaves a partial file behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::RendicionError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, RendicionError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| RendicionError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| RendicionError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read a UTF-8 file, returning `None` if it doesn't exist
///
/// Content that is not valid UTF-8 is a [`RendicionError::Format`].
pub fn read_text_optional<P: AsRef<Path>>(path: P) -> Result<Option<String>, RendicionError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let bytes = fs::read(path)
        .map_err(|e| RendicionError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    decode_utf8(path, bytes).map(Some)
}

/// Read a UTF-8 file that must exist
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, RendicionError> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| RendicionError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    decode_utf8(path, bytes)
}

fn decode_utf8(path: &Path, bytes: Vec<u8>) -> Result<String, RendicionError> {
    String::from_utf8(bytes).map_err(|e| {
        RendicionError::Format(format!("{} is not valid UTF-8: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), RendicionError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let mut bytes = serde_json::to_vec_pretty(data)
        .map_err(|e| RendicionError::Storage(format!("Failed to serialize data: {}", e)))?;
    bytes.push(b'\n');
    write_bytes_atomic(path, &bytes)
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), RendicionError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            RendicionError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| RendicionError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    let written = writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .and_then(|_| writer.get_ref().sync_all());
    drop(writer);

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(RendicionError::Storage(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        RendicionError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
