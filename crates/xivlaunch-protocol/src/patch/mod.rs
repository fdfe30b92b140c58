//! Patch download and installation
//!
//! A run has two phases:
//!
//! 1. **Download**: every patch that is not already on disk is fetched
//!    concurrently into `<patches_dir>/<repository>/<name>.patch`. The phase
//!    only ends once every download task has finished.
//! 2. **Install**: in manifest order, each file is verified against its block
//!    hashes, handed to the target's [`DataStore`](crate::store::DataStore),
//!    and the repository's version marker is updated.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xivlaunch_protocol::patch::{PatchEngine, PatchOptions};
//! use xivlaunch_protocol::store::{DataStore, Target};
//! use xivlaunch_protocol::HttpClient;
//! use xivlaunch_formats::PatchList;
//!
//! # async fn example(game: &mut dyn DataStore, body: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let patches = PatchList::parse(body)?;
//! let options = PatchOptions::new("/opt/ffxiv/game", "/opt/ffxiv/patches");
//! let mut engine = PatchEngine::new(HttpClient::new()?, Target::Game(game), options);
//! engine.run(patches.patches()).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod tracker;
pub mod verify;

pub use error::PatchError;
pub use tracker::DownloadTracker;

use futures::StreamExt;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use xivlaunch_formats::{PatchEntry, VersionMarker};

use crate::error::ProtocolError;
use crate::progress::{NoProgress, PatchEvent, ProgressReporter};
use crate::store::Target;
use crate::transport::{HttpClient, PATCH_USER_AGENT};

/// Options of one patch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
    /// Root of the target data, where version markers are written
    pub install_dir: PathBuf,
    /// Directory patch files are downloaded into
    pub patches_dir: PathBuf,
    /// Keep patch files after they are installed
    pub keep_patches: bool,
    /// Maximum downloads in flight at once
    pub max_concurrent_downloads: usize,
}

impl PatchOptions {
    pub fn new(install_dir: impl Into<PathBuf>, patches_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            patches_dir: patches_dir.into(),
            keep_patches: false,
            max_concurrent_downloads: 4,
        }
    }

    #[must_use]
    pub fn keep_patches(mut self, keep: bool) -> Self {
        self.keep_patches = keep;
        self
    }

    #[must_use]
    pub fn max_concurrent_downloads(mut self, max: usize) -> Self {
        self.max_concurrent_downloads = max;
        self
    }
}

/// A patch scheduled in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPatch {
    pub entry: PatchEntry,
    /// Final location of the downloaded file
    pub path: PathBuf,
    pub bytes_downloaded: u64,
    pub downloaded: bool,
    pub is_boot: bool,
}

/// Downloads, verifies and installs a list of patches into one target
pub struct PatchEngine<'a> {
    http: HttpClient,
    target: Target<'a>,
    options: PatchOptions,
    reporter: Arc<dyn ProgressReporter>,
}

impl<'a> PatchEngine<'a> {
    pub fn new(http: HttpClient, target: Target<'a>, options: PatchOptions) -> Self {
        Self {
            http,
            target,
            options,
            reporter: Arc::new(NoProgress),
        }
    }

    /// Send progress events to `reporter`
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Install `patches` in order
    ///
    /// Nothing is applied until every download has finished. A failed
    /// download, a file that fails verification or a failed apply stops the
    /// run; earlier patches stay installed.
    pub async fn run(&mut self, patches: &[PatchEntry]) -> Result<(), PatchError> {
        if patches.is_empty() {
            return Ok(());
        }

        let mut queue = self.queue(patches);
        tracing::info!(
            "Patching {} with {} patches",
            if self.target.is_boot() { "boot" } else { "game" },
            queue.len()
        );

        self.reporter
            .report(&PatchEvent::Stage("Downloading patches".to_string()));
        self.download_all(&mut queue).await?;

        self.reporter
            .report(&PatchEvent::Stage("Installing patches".to_string()));
        self.install_all(&queue).await
    }

    fn queue(&self, patches: &[PatchEntry]) -> Vec<QueuedPatch> {
        let is_boot = self.target.is_boot();
        patches
            .iter()
            .map(|entry| QueuedPatch {
                path: self
                    .options
                    .patches_dir
                    .join(&entry.repository)
                    .join(entry.file_name()),
                entry: entry.clone(),
                bytes_downloaded: 0,
                downloaded: false,
                is_boot,
            })
            .collect()
    }

    async fn download_all(&self, queue: &mut [QueuedPatch]) -> Result<(), PatchError> {
        let tracker = Arc::new(Mutex::new(DownloadTracker::new(
            queue.iter().map(|patch| patch.entry.length),
        )));
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent_downloads.max(1)));
        let mut tasks = JoinSet::new();

        for (index, patch) in queue.iter_mut().enumerate() {
            if patch.path.exists() {
                tracing::debug!("Patch {} already downloaded", patch.entry.name);
                patch.downloaded = true;
                tracker.lock().finish(index, patch.entry.length);
                continue;
            }

            if let Some(parent) = patch.path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| PatchError::io(parent, e))?;
            }

            let download = Download {
                http: self.http.clone(),
                url: patch.entry.url.clone(),
                path: patch.path.clone(),
                index,
                tracker: Arc::clone(&tracker),
                reporter: Arc::clone(&self.reporter),
            };
            let semaphore = Arc::clone(&semaphore);
            let name = patch.entry.name.clone();

            tasks.spawn(async move {
                // Only fails once the semaphore is closed, which never happens here
                let _permit = semaphore.acquire_owned().await.ok();
                let result = download
                    .run()
                    .await
                    .map_err(|source| PatchError::Download { name, source });
                (index, result)
            });
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(()))) => queue[index].downloaded = true,
                Ok((_, Err(e))) => {
                    tracing::warn!("{}", e);
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    first_error.get_or_insert(PatchError::from(e));
                }
            }
        }

        let tracker = tracker.lock();
        for (index, patch) in queue.iter_mut().enumerate() {
            patch.bytes_downloaded = tracker.received(index);
        }
        tracing::debug!("{} of {} downloads finished", tracker.finished(), queue.len());

        first_error.map_or(Ok(()), Err)
    }

    async fn install_all(&mut self, queue: &[QueuedPatch]) -> Result<(), PatchError> {
        let count = queue.len();

        for (index, patch) in queue.iter().enumerate() {
            self.reporter.report(&PatchEvent::Install { index, count });

            let path = patch.path.clone();
            let entry = patch.entry.clone();
            let verified =
                tokio::task::spawn_blocking(move || verify::verify_patch(&path, &entry)).await?;
            if let Err(e) = verified {
                if e.is_integrity() {
                    tracing::warn!("{}, discarding {}", e, patch.path.display());
                    remove_patch_file(&patch.path).await;
                }
                return Err(e);
            }

            tracing::info!("Installing patch {} ({}/{})", patch.entry.name, index + 1, count);
            let store = self.target.store();
            run_blocking(|| store.apply_patch(&patch.path)).map_err(|source| {
                tracing::error!("Failed to apply {}: {}", patch.entry.name, source);
                PatchError::ApplyFailed {
                    name: patch.entry.name.clone(),
                    source,
                }
            })?;

            let marker = if patch.is_boot {
                VersionMarker::Boot
            } else {
                VersionMarker::Repository(&patch.entry.repository)
            };
            marker.write(&self.options.install_dir, &patch.entry.version)?;

            if !self.options.keep_patches {
                remove_patch_file(&patch.path).await;
            }
        }

        Ok(())
    }
}

/// Run synchronous store work without stalling the other tasks on this worker
///
/// `block_in_place` is only available on the multi-thread runtime; elsewhere
/// the work runs inline.
fn run_blocking<T>(work: impl FnOnce() -> T) -> T {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(work),
        _ => work(),
    }
}

async fn remove_patch_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("Failed to remove {}: {}", path.display(), e);
    }
}

/// Path a download is written to before it is complete
fn partial_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_owned();
    partial.push("~");
    PathBuf::from(partial)
}

/// One download task
struct Download {
    http: HttpClient,
    url: String,
    path: PathBuf,
    index: usize,
    tracker: Arc<Mutex<DownloadTracker>>,
    reporter: Arc<dyn ProgressReporter>,
}

impl Download {
    async fn run(self) -> Result<(), ProtocolError> {
        let partial = partial_path(&self.path);
        let result = self.fetch(&partial).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(&partial).await;
        }
        result
    }

    async fn fetch(&self, partial: &Path) -> Result<(), ProtocolError> {
        tracing::debug!("Downloading {}", self.url);

        let response = self
            .http
            .inner()
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, PATCH_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::HttpStatus(status));
        }

        let mut file = tokio::fs::File::create(partial).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            let (received, total) = self.tracker.lock().record(self.index, chunk.len() as u64);
            self.reporter
                .report(&PatchEvent::Download { received, total });
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(partial, &self.path).await?;
        let (received, total) = {
            let mut tracker = self.tracker.lock();
            let received = tracker.received(self.index);
            tracker.finish(self.index, received)
        };
        tracing::debug!("Downloaded {} ({}/{} bytes)", self.path.display(), received, total);
        Ok(())
    }
}
