//! Text formats exchanged with the FFXIV patch and login servers
//!
//! # Supported Formats
//!
//! - **Patch list**: the multipart-framed, tab separated manifest the patch
//!   servers return when an update is pending
//! - **Version markers**: the `.ver` files recording the installed version of
//!   boot data and each game repository
//! - **Version report**: the hash report posted when registering a session
//!
//! # Example
//!
//! ```
//! use xivlaunch_formats::patch_list::PatchList;
//!
//! let list = PatchList::parse("").expect("Test operation should succeed");
//! assert!(list.patches().is_empty());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod patch_list;
pub mod version_file;
pub mod version_report;

pub use error::{FormatError, Result};
pub use patch_list::{PatchEntry, PatchList, PatchListError};
pub use version_file::VersionMarker;
pub use version_report::{FileHash, VersionReport};
