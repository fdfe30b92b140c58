//! Version report sent when registering a session
//!
//! The first line names the boot version and the size and SHA-1 of each boot
//! executable; every following line names one expansion and its version:
//!
//! ```text
//! 2023.09.14.0000.0001=ffxivboot.exe/1234/ab12...,ffxivboot64.exe/5678/cd34...
//! ex1	2023.07.26.0000.0001
//! ex2	2012.01.01.0000.0000
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use sha1::{Digest, Sha1};

use crate::error::{FormatError, Result};
use crate::version_file::DEFAULT_VERSION;

/// Boot executables covered by the report, in report order
pub const BOOT_FILES: [&str; 6] = [
    "ffxivboot.exe",
    "ffxivboot64.exe",
    "ffxivlauncher.exe",
    "ffxivlauncher64.exe",
    "ffxivupdater.exe",
    "ffxivupdater64.exe",
];

/// Size and SHA-1 digest of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHash {
    /// File name as reported
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Lowercase hex SHA-1 digest
    pub sha1: String,
}

impl FileHash {
    /// Hash an in-memory file
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            sha1: hex::encode(Sha1::digest(data)),
        }
    }

    /// Hash `name` inside `dir`
    pub fn from_path(dir: &Path, name: &str) -> Result<Self> {
        let path = dir.join(name);
        let data = fs::read(&path).map_err(|e| FormatError::io(&path, e))?;
        Ok(Self::from_bytes(name, &data))
    }
}

impl fmt::Display for FileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.name, self.size, self.sha1)
    }
}

/// Builder for the version report body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    boot_version: String,
    files: Vec<FileHash>,
    expansions: Vec<String>,
}

impl VersionReport {
    /// Start a report for the given boot version
    pub fn new(boot_version: impl Into<String>) -> Self {
        Self {
            boot_version: boot_version.into(),
            files: Vec::new(),
            expansions: Vec::new(),
        }
    }

    /// Hash every entry of [`BOOT_FILES`] inside `boot_dir`
    pub fn with_boot_files(mut self, boot_dir: &Path) -> Result<Self> {
        for name in BOOT_FILES {
            self.files.push(FileHash::from_path(boot_dir, name)?);
        }
        Ok(self)
    }

    /// Append an already computed file hash
    #[must_use]
    pub fn with_file(mut self, file: FileHash) -> Self {
        self.files.push(file);
        self
    }

    /// Report `ex1..=max_expansion`
    ///
    /// `installed[i]` is the version of `ex{i + 1}`; expansions past the end
    /// of `installed`, or with an empty version, report [`DEFAULT_VERSION`].
    #[must_use]
    pub fn with_expansions(mut self, max_expansion: u32, installed: &[String]) -> Self {
        self.expansions = (0..max_expansion as usize)
            .map(|index| match installed.get(index) {
                Some(version) if !version.is_empty() => version.clone(),
                _ => DEFAULT_VERSION.to_string(),
            })
            .collect();
        self
    }

    /// Report body as sent to the server
    pub fn build(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VersionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.boot_version)?;
        for (index, file) in self.files.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{file}")?;
        }
        for (index, version) in self.expansions.iter().enumerate() {
            write!(f, "\nex{}\t{}", index + 1, version)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_file_hash() {
        let hash = FileHash::from_bytes("ffxivboot.exe", b"abc");
        assert_eq!(hash.size, 3);
        assert_eq!(hash.sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            hash.to_string(),
            "ffxivboot.exe/3/a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_report_layout() {
        let report = VersionReport::new("2023.09.14.0000.0001")
            .with_file(FileHash::from_bytes("ffxivboot.exe", b"abc"))
            .with_file(FileHash::from_bytes("ffxivboot64.exe", b""))
            .with_expansions(3, &["2023.07.26.0000.0001".to_string()]);

        assert_eq!(
            report.build(),
            "2023.09.14.0000.0001=\
             ffxivboot.exe/3/a9993e364706816aba3e25717850c26c9cd0d89d,\
             ffxivboot64.exe/0/da39a3ee5e6b4b0d3255bfef95601890afd80709\n\
             ex1\t2023.07.26.0000.0001\n\
             ex2\t2012.01.01.0000.0000\n\
             ex3\t2012.01.01.0000.0000"
        );
    }

    #[test]
    fn test_no_expansions() {
        let report = VersionReport::new("2023.09.14.0000.0001").with_expansions(0, &[]);
        assert_eq!(report.build(), "2023.09.14.0000.0001=");
    }

    #[test]
    fn test_boot_files_from_disk() {
        let dir = TempDir::new().expect("Test operation should succeed");
        for name in BOOT_FILES {
            fs::write(dir.path().join(name), name).expect("Test operation should succeed");
        }

        let report = VersionReport::new("2023.09.14.0000.0001")
            .with_boot_files(dir.path())
            .expect("Test operation should succeed")
            .build();

        let first_line = report.lines().next().expect("Test operation should succeed");
        assert_eq!(first_line.matches(',').count(), BOOT_FILES.len() - 1);
        assert!(first_line.contains("ffxivupdater64.exe/18/"));
    }

    #[test]
    fn test_missing_boot_file() {
        let dir = TempDir::new().expect("Test operation should succeed");
        let result = VersionReport::new("2023.09.14.0000.0001").with_boot_files(dir.path());
        assert!(matches!(result, Err(FormatError::Io { .. })));
    }
}
