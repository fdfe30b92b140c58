//! Installed data the patch engine operates on

use std::io;
use std::path::Path;

/// Handle to an installed data set that can report versions and apply patches
///
/// Decoding and applying the patch file format is left to the implementation.
pub trait DataStore: Send {
    /// Installed version of `repository`, `None` if it is not installed
    fn version(&self, repository: &str) -> Option<String>;

    /// Apply a verified patch file
    fn apply_patch(&mut self, path: &Path) -> io::Result<()>;
}

/// Data set a patch run targets
pub enum Target<'a> {
    /// Launcher and updater executables
    Boot(&'a mut dyn DataStore),
    /// Game data, base repository and expansions
    Game(&'a mut dyn DataStore),
}

impl Target<'_> {
    /// Whether this is the boot data target
    pub fn is_boot(&self) -> bool {
        matches!(self, Self::Boot(_))
    }

    /// Store that receives the patches
    pub fn store(&mut self) -> &mut dyn DataStore {
        match self {
            Self::Boot(store) | Self::Game(store) => &mut **store,
        }
    }
}

impl std::fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boot(_) => f.write_str("Target::Boot"),
            Self::Game(_) => f.write_str("Target::Game"),
        }
    }
}
