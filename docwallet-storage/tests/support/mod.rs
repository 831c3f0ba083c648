//! Shared fixtures for storage tests.

#![allow(dead_code)]

use async_trait::async_trait;
use docwallet_crypto::{
    CryptoError, CryptoResult, MemorySecretStore, OsRandom, RandomSource, SecretStore,
};
use docwallet_import::{
    CopyDestination, DirectoryHandle, DocumentPicker, LocalCopyRequest, LocalCopyResult,
    PickOutcome, PickRequest, PickedFile, PickerError,
};
use docwallet_storage::{DocumentStorage, ErrorReporter, StorageConfig};
use docwallet_types::DocumentId;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("docwallet_storage=debug"))
        .with_test_writer()
        .try_init();
}

pub fn doc_id(id: &str) -> DocumentId {
    DocumentId::parse(id).unwrap()
}

/// Secret store counting reads and deletes, with an optional delete failure.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: MemorySecretStore,
    pub gets: Arc<AtomicUsize>,
    pub deletes: Arc<AtomicUsize>,
    pub fail_deletes: Arc<AtomicBool>,
}

impl CountingStore {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for CountingStore {
    async fn set(&self, service_id: &str, secret: &str) -> CryptoResult<()> {
        self.inner.set(service_id, secret).await
    }

    async fn get(&self, service_id: &str) -> CryptoResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(service_id).await
    }

    async fn delete(&self, service_id: &str) -> CryptoResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CryptoError::SecretStore("keychain locked".into()));
        }
        self.inner.delete(service_id).await
    }
}

/// OS randomness for the first `limit` draws, then failure.
pub struct LimitedRandom {
    remaining: AtomicUsize,
}

impl LimitedRandom {
    pub fn new(limit: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(limit),
        }
    }
}

impl RandomSource for LimitedRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> CryptoResult<()> {
        let granted = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !granted {
            return Err(CryptoError::Random("entropy exhausted".into()));
        }
        OsRandom.fill_bytes(dest)
    }
}

/// Reporter collecting every soft failure it receives.
#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, context: &str, error: &(dyn Error + 'static)) {
        self.reports.lock().unwrap().push(format!("{context}: {error}"));
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub config: StorageConfig,
    pub store: CountingStore,
    pub reporter: Arc<RecordingReporter>,
    pub storage: DocumentStorage,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_random(Arc::new(OsRandom))
    }

    pub fn with_random(random: Arc<dyn RandomSource>) -> Self {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let config = StorageConfig::for_root(dir.path().join("data"));
        let store = CountingStore::default();
        let reporter = Arc::new(RecordingReporter::default());
        let storage = DocumentStorage::with_parts(
            &config,
            Arc::new(store.clone()),
            random,
            reporter.clone(),
        );
        Self {
            dir,
            config,
            store,
            reporter,
            storage,
        }
    }

    /// Writes a source file outside the storage root.
    pub async fn source_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let inbox = self.dir.path().join("inbox");
        tokio::fs::create_dir_all(&inbox).await.unwrap();
        let path = inbox.join(name);
        tokio::fs::write(&path, bytes).await.unwrap();
        path
    }

    /// Writes a source file into the cache directory.
    pub async fn cached_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        tokio::fs::create_dir_all(&self.config.cache_dir).await.unwrap();
        let path = self.config.cache_dir.join(name);
        tokio::fs::write(&path, bytes).await.unwrap();
        path
    }

    pub fn encrypted_dir(&self) -> &Path {
        self.storage.layout().encrypted_dir()
    }

    pub fn documents_dir(&self) -> &Path {
        self.storage.layout().documents_dir()
    }

    pub fn cache_dir(&self) -> &Path {
        self.storage.layout().cache_dir()
    }
}

pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

pub async fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return names;
    };
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    names
}

/// Picker returning the given local files.
pub struct LocalPicker {
    pub files: Vec<PickedFile>,
    pub requests: Mutex<Vec<PickRequest>>,
}

impl LocalPicker {
    pub fn new(files: Vec<PickedFile>) -> Self {
        Self {
            files,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DocumentPicker for LocalPicker {
    async fn pick(&self, request: &PickRequest) -> Result<PickOutcome, PickerError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(PickOutcome::Picked(self.files.clone()))
    }

    async fn pick_directory(
        &self,
        _request_long_term_access: bool,
    ) -> Result<Option<DirectoryHandle>, PickerError> {
        Ok(None)
    }

    async fn keep_local_copy(
        &self,
        files: &[LocalCopyRequest],
        _destination: CopyDestination,
    ) -> Result<Vec<LocalCopyResult>, PickerError> {
        Ok(files
            .iter()
            .map(|req| LocalCopyResult::Error {
                source_uri: req.uri.clone(),
                copy_error: "not available".into(),
            })
            .collect())
    }
}

pub fn picked(path: &Path, mime: &str) -> PickedFile {
    PickedFile {
        uri: path.to_string_lossy().into_owned(),
        name: path.file_name().unwrap().to_string_lossy().into_owned(),
        size: std::fs::metadata(path).ok().map(|m| m.len()),
        mime_type: Some(mime.to_string()),
        is_virtual: false,
        convertible_to_mime_types: Vec::new(),
    }
}
