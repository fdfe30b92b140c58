/// One patch record from a patch list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchEntry {
    /// Patch name, identical to the version it installs
    pub name: String,
    /// Download URL
    pub url: String,
    /// Repository the patch belongs to (`boot`, `game`, `ex1`, ...)
    pub repository: String,
    /// Version the repository is at after applying this patch
    pub version: String,
    /// Hash algorithm named by the record (`sha1`), if hashed
    pub hash_type: Option<String>,
    /// Hex digests of each hash block, in file order
    pub hashes: Vec<String>,
    /// Size of each hash block in bytes
    pub hash_block_size: u64,
    /// Total patch file size in bytes
    pub length: u64,
}

impl PatchEntry {
    /// Whether the record carries block hashes to verify against
    pub fn is_hashed(&self) -> bool {
        !self.hashes.is_empty()
    }

    /// Number of hash blocks a file of `length` bytes splits into
    pub fn block_count(&self) -> u64 {
        if self.hash_block_size == 0 {
            return 0;
        }
        self.length.div_ceil(self.hash_block_size)
    }

    /// File name the patch is stored under while it waits to be installed
    pub fn file_name(&self) -> String {
        format!("{}.patch", self.name)
    }
}
