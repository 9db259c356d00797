//! Writing program documents and render bundles to disk.
//!
//! Writes are atomic: contents go to a locked temp file in the destination
//! directory, are synced, then renamed over the target. A reader never sees
//! a half-written program or bundle.

use crate::overview::RenderBundle;
use crate::{Error, Program, Result};
use fs2::FileExt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;

    // Exclusive lock serializes concurrent writers of the same document
    temp.as_file().lock_exclusive()?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Load a program document
///
/// Unlike configuration, a missing or malformed program is an error: the
/// caller asked for this specific document.
pub fn load_program(path: &Path) -> Result<Program> {
    let contents = std::fs::read_to_string(path)?;
    let program: Program = serde_json::from_str(&contents)?;
    tracing::info!(
        "Loaded program with {} packages from {:?}",
        program.packages.len(),
        path
    );
    Ok(program)
}

/// Save a program document atomically
pub fn save_program(program: &Program, path: &Path) -> Result<()> {
    let contents = serde_json::to_vec_pretty(program)?;
    write_atomic(path, &contents)?;
    tracing::info!("Saved program to {:?}", path);
    Ok(())
}

/// Write the bundle for the document renderer, returning the byte count
///
/// Failures carry the destination and size so they can be reported verbatim.
pub fn write_bundle(bundle: &RenderBundle, path: &Path) -> Result<usize> {
    let contents = serde_json::to_vec_pretty(bundle)?;
    let bytes = contents.len();
    write_atomic(path, &contents).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        bytes,
        source,
    })?;
    tracing::info!("Wrote {} byte render bundle to {:?}", bytes, path);
    Ok(bytes)
}
