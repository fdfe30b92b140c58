//! Block hash verification of downloaded patch files

use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xivlaunch_formats::PatchEntry;

use super::PatchError;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Check a downloaded file against the size and block hashes of its record
///
/// Records without hashes are accepted as is.
pub fn verify_patch(path: &Path, entry: &PatchEntry) -> Result<(), PatchError> {
    if !entry.is_hashed() {
        return Ok(());
    }

    let mut file = File::open(path).map_err(|e| PatchError::io(path, e))?;
    let actual = file
        .metadata()
        .map_err(|e| PatchError::io(path, e))?
        .len();
    if actual != entry.length {
        return Err(PatchError::WrongSize {
            name: entry.name.clone(),
            expected: entry.length,
            actual,
        });
    }

    let blocks = entry.block_count();
    if blocks != entry.hashes.len() as u64 {
        return Err(PatchError::HashCountMismatch {
            name: entry.name.clone(),
            blocks,
            hashes: entry.hashes.len(),
        });
    }

    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut offset = 0u64;
    for (block, expected) in entry.hashes.iter().enumerate() {
        let mut remaining = entry.hash_block_size.min(entry.length - offset);
        offset += remaining;

        let mut hasher = Sha1::new();
        while remaining > 0 {
            let want = remaining.min(READ_BUFFER_SIZE as u64) as usize;
            file.read_exact(&mut buffer[..want])
                .map_err(|e| PatchError::io(path, e))?;
            hasher.update(&buffer[..want]);
            remaining -= want as u64;
        }

        let actual = hex::encode(hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(PatchError::HashMismatch {
                name: entry.name.clone(),
                block,
                expected: expected.clone(),
                actual,
            });
        }
    }

    Ok(())
}
