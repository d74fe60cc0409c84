//! Filesystem helpers for platforms without a native sharing layer.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// The directory downloads should land in.
///
/// Uses the platform's well-known downloads directory where one exists,
/// falling back to the process's current working directory.
pub fn downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Opens the file with whatever the platform associates with it.
pub fn open_file(path: &Path) -> Result<()> {
    debug!("opening {} with the platform default handler", path.display());
    open::that(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downloads_dir_is_usable() {
        let dir = downloads_dir();
        assert!(dir.is_absolute());
    }
}
