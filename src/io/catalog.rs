use crossbeam::channel::{unbounded, Receiver, Sender};
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::error::{Result, VerCalcError};
use crate::io::input::{manufacturer_file_stem, parse_coil_array, parse_manufacturers, CoilRecord};

pub const MASTER_FILE: &str = "master_coil_database_new.json";

/// Read-only access to the raw catalog payloads.
pub trait CatalogSource: Send + Sync {
    /// The master database, used only to enumerate manufacturers.
    fn read_master(&self) -> Result<Vec<u8>>;

    /// The coil array of one manufacturer, addressed by its file stem.
    fn read_manufacturer(&self, file_stem: &str) -> Result<Vec<u8>>;
}

/// Catalog stored as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct DirCatalogSource {
    root: PathBuf,
    master_file: String,
}

impl DirCatalogSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_master_file(root, MASTER_FILE)
    }

    pub fn with_master_file(root: impl Into<PathBuf>, master_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            master_file: master_file.into(),
        }
    }
}

impl CatalogSource for DirCatalogSource {
    fn read_master(&self) -> Result<Vec<u8>> {
        Ok(fs::read(self.root.join(&self.master_file))?)
    }

    fn read_manufacturer(&self, file_stem: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.root.join(format!("{}.json", file_stem)))?)
    }
}

pub fn load_manufacturers(source: &dyn CatalogSource) -> Result<Vec<String>> {
    let bytes = source.read_master()?;
    parse_manufacturers(&bytes)
}

pub fn load_manufacturer_coils(source: &dyn CatalogSource, manufacturer: &str) -> Result<Vec<CoilRecord>> {
    let file_stem = manufacturer_file_stem(manufacturer);
    tracing::debug!(manufacturer, file_stem = %file_stem, "loading manufacturer catalog");
    let bytes = source.read_manufacturer(&file_stem)?;
    parse_coil_array(&bytes)
}

/// Outcome of one background catalog fetch.
#[derive(Debug)]
pub struct CatalogResponse {
    pub generation: u64,
    pub manufacturer: String,
    pub result: Result<Vec<CoilRecord>>,
}

/// Fetches manufacturer catalogs off the caller's thread.
///
/// Every request bumps a generation counter and only the response for the
/// newest generation is handed back, so a slow fetch for a manufacturer the
/// user has already moved away from can never overwrite a newer selection.
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    tx: Sender<CatalogResponse>,
    rx: Receiver<CatalogResponse>,
    latest: u64,
    pending: bool,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            source,
            tx,
            rx,
            latest: 0,
            pending: false,
        }
    }

    pub fn source(&self) -> &dyn CatalogSource {
        self.source.as_ref()
    }

    /// Starts fetching `manufacturer` and returns the request generation.
    pub fn request(&mut self, manufacturer: &str) -> u64 {
        self.latest += 1;
        self.pending = true;

        let generation = self.latest;
        let manufacturer = manufacturer.to_string();
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                load_manufacturer_coils(source.as_ref(), &manufacturer)
            }))
            .unwrap_or_else(|_| Err(VerCalcError::Worker(format!("fetch for {} panicked", manufacturer))));
            // the loader may already be gone
            let _ = tx.send(CatalogResponse {
                generation,
                manufacturer,
                result,
            });
        });
        generation
    }

    /// Makes every in-flight request stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Non-blocking: returns the response to the latest request if it has arrived.
    pub fn poll(&mut self) -> Option<CatalogResponse> {
        let arrived: Vec<CatalogResponse> = self.rx.try_iter().collect();
        let mut current = None;
        for response in arrived {
            if let Some(response) = self.accept(response) {
                current = Some(response);
            }
        }
        current
    }

    /// Blocks until the latest request resolves. Returns `None` if nothing is pending.
    pub fn wait(&mut self) -> Option<CatalogResponse> {
        while self.pending {
            let response = self.rx.recv().ok()?;
            if let Some(response) = self.accept(response) {
                return Some(response);
            }
        }
        None
    }

    fn accept(&mut self, response: CatalogResponse) -> Option<CatalogResponse> {
        if response.generation != self.latest {
            tracing::debug!(
                manufacturer = %response.manufacturer,
                generation = response.generation,
                latest = self.latest,
                "dropping stale catalog response"
            );
            return None;
        }
        self.pending = false;
        Some(response)
    }
}
