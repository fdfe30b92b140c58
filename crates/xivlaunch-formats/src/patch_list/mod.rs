//! Patch list format support
//!
//! The patch servers answer version queries with a multipart-shaped body.
//! Lines are CRLF separated; the first five lines and the last two are
//! boundary and header framing, every line in between is one patch record.
//!
//! # Format Overview
//!
//! Records are tab separated and come in two shapes:
//!
//! - 9 fields, game repository patches that carry block hashes:
//!   `length, _, _, _, version, hash type, hash block size, hashes, url`
//! - 6 fields, boot patches without hashes:
//!   `length, _, _, _, version, url`
//!
//! # Example
//!
//! ```
//! use xivlaunch_formats::patch_list::PatchList;
//!
//! let body = [
//!     "--477D80B1_38BC_41d4_8B48_5273ADB89CAC",
//!     "Content-Type: application/octet-stream",
//!     "Content-Location: ffxivpatch/2b5cbc63/metainfo/D2023.09.14.0000.0001.http",
//!     "X-Patch-Length: 22221335",
//!     "",
//!     "22221335\t69674819\t19\t18\t2023.09.14.0000.0001\thttp://patch-dl.ffxiv.com/boot/2b5cbc63/D2023.09.14.0000.0001.patch",
//!     "--477D80B1_38BC_41d4_8B48_5273ADB89CAC--",
//!     "",
//! ]
//! .join("\r\n");
//!
//! let list = PatchList::parse(&body).expect("Test operation should succeed");
//! assert_eq!(list.len(), 1);
//! assert_eq!(list.patches()[0].version, "2023.09.14.0000.0001");
//! assert_eq!(list.patches()[0].repository, "boot");
//! ```

mod entry;
mod reader;

pub use entry::PatchEntry;
pub use reader::{PatchList, PatchListError};
