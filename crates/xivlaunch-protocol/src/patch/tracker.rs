/// Shared download state of one patch run
///
/// Lives behind a single mutex; every download task updates its own slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadTracker {
    received: Vec<u64>,
    received_total: u64,
    total: u64,
    finished: usize,
}

impl DownloadTracker {
    /// Track downloads of files with the given lengths
    pub fn new(lengths: impl IntoIterator<Item = u64>) -> Self {
        let lengths: Vec<u64> = lengths.into_iter().collect();
        Self {
            received: vec![0; lengths.len()],
            received_total: 0,
            total: lengths.iter().sum(),
            finished: 0,
        }
    }

    /// Add `bytes` to the slot at `index`, returning `(received, total)`
    pub fn record(&mut self, index: usize, bytes: u64) -> (u64, u64) {
        if let Some(slot) = self.received.get_mut(index) {
            *slot += bytes;
            self.received_total += bytes;
        }
        (self.received_total, self.total)
    }

    /// Mark the download at `index` as finished
    ///
    /// `bytes` replaces whatever was recorded, for files already on disk.
    pub fn finish(&mut self, index: usize, bytes: u64) -> (u64, u64) {
        if let Some(slot) = self.received.get_mut(index) {
            self.received_total = self.received_total - *slot + bytes;
            *slot = bytes;
            self.finished += 1;
        }
        (self.received_total, self.total)
    }

    /// Bytes received for the download at `index`
    pub fn received(&self, index: usize) -> u64 {
        self.received.get(index).copied().unwrap_or(0)
    }

    /// Number of finished downloads
    pub fn finished(&self) -> usize {
        self.finished
    }
}
