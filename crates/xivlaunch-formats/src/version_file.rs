//! Installed version markers
//!
//! Each installed data set records its version in a small text file holding
//! only the version string, with no trailing newline:
//!
//! - boot data: `<install>/ffxivboot.ver`
//! - base game: `<install>/ffxivgame.ver`
//! - expansion `exN`: `<install>/sqpack/exN/exN.ver`

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{FormatError, Result};

/// Repository name of the base game
pub const BASE_REPOSITORY: &str = "game";

/// Version reported for anything that is not installed
pub const DEFAULT_VERSION: &str = "2012.01.01.0000.0000";

/// Which version marker file to address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMarker<'a> {
    /// Boot data marker, independent of repository
    Boot,
    /// Game data marker for the named repository
    Repository(&'a str),
}

impl VersionMarker<'_> {
    /// Location of the marker under `install_dir`
    pub fn path(&self, install_dir: &Path) -> PathBuf {
        match self {
            Self::Boot => install_dir.join("ffxivboot.ver"),
            Self::Repository(BASE_REPOSITORY) => install_dir.join("ffxivgame.ver"),
            Self::Repository(repository) => install_dir
                .join("sqpack")
                .join(repository)
                .join(format!("{repository}.ver")),
        }
    }

    /// Read the recorded version, `None` when the marker does not exist
    pub fn read(&self, install_dir: &Path) -> Result<Option<String>> {
        let path = self.path(install_dir);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FormatError::io(path, e)),
        }
    }

    /// Record `version`, creating parent directories as needed
    pub fn write(&self, install_dir: &Path, version: &str) -> Result<()> {
        let path = self.path(install_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| FormatError::io(parent, e))?;
        }
        fs::write(&path, version).map_err(|e| FormatError::io(&path, e))?;
        tracing::debug!("Wrote version {} to {}", version, path.display());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_marker_paths() {
        let root = Path::new("/opt/ffxiv/game");
        assert_eq!(VersionMarker::Boot.path(root), root.join("ffxivboot.ver"));
        assert_eq!(
            VersionMarker::Repository("game").path(root),
            root.join("ffxivgame.ver")
        );
        assert_eq!(
            VersionMarker::Repository("ex2").path(root),
            root.join("sqpack").join("ex2").join("ex2.ver")
        );
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().expect("Test operation should succeed");
        let marker = VersionMarker::Repository("ex1");

        assert_eq!(marker.read(dir.path()).expect("Test operation should succeed"), None);

        marker
            .write(dir.path(), "2023.07.26.0000.0001")
            .expect("Test operation should succeed");

        let raw = fs::read(marker.path(dir.path())).expect("Test operation should succeed");
        assert_eq!(raw, b"2023.07.26.0000.0001");
        assert_eq!(
            marker.read(dir.path()).expect("Test operation should succeed"),
            Some("2023.07.26.0000.0001".to_string())
        );
    }
}
