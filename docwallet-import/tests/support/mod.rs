//! Scriptable picker for import tests.

use async_trait::async_trait;
use docwallet_import::{
    ConvertibleType, CopyDestination, DirectoryHandle, DocumentPicker, LocalCopyRequest,
    LocalCopyResult, PickOutcome, PickRequest, PickedFile, PickerError,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Picker returning a fixed outcome. `keep_local_copy` writes the bytes
/// registered for a URI into `copy_dir`, or reports a copy error when none
/// are registered.
pub struct FakePicker {
    outcome: Result<PickOutcome, PickerError>,
    directory: Option<DirectoryHandle>,
    copy_dir: PathBuf,
    copyable: HashMap<String, Vec<u8>>,
    pub pick_requests: Mutex<Vec<PickRequest>>,
    pub copy_requests: Mutex<Vec<LocalCopyRequest>>,
}

impl FakePicker {
    pub fn new(outcome: Result<PickOutcome, PickerError>, copy_dir: impl Into<PathBuf>) -> Self {
        Self {
            outcome,
            directory: None,
            copy_dir: copy_dir.into(),
            copyable: HashMap::new(),
            pick_requests: Mutex::new(Vec::new()),
            copy_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn picking(files: Vec<PickedFile>, copy_dir: impl Into<PathBuf>) -> Self {
        Self::new(Ok(PickOutcome::Picked(files)), copy_dir)
    }

    pub fn with_copyable(mut self, uri: &str, bytes: &[u8]) -> Self {
        self.copyable.insert(uri.to_string(), bytes.to_vec());
        self
    }

    pub fn with_directory(mut self, uri: &str) -> Self {
        self.directory = Some(DirectoryHandle { uri: uri.to_string() });
        self
    }
}

#[async_trait]
impl DocumentPicker for FakePicker {
    async fn pick(&self, request: &PickRequest) -> Result<PickOutcome, PickerError> {
        self.pick_requests.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }

    async fn pick_directory(
        &self,
        _request_long_term_access: bool,
    ) -> Result<Option<DirectoryHandle>, PickerError> {
        Ok(self.directory.clone())
    }

    async fn keep_local_copy(
        &self,
        files: &[LocalCopyRequest],
        _destination: CopyDestination,
    ) -> Result<Vec<LocalCopyResult>, PickerError> {
        let mut results = Vec::new();
        for req in files {
            self.copy_requests.lock().unwrap().push(req.clone());
            match self.copyable.get(&req.uri) {
                Some(bytes) => {
                    std::fs::create_dir_all(&self.copy_dir).unwrap();
                    let local = self.copy_dir.join(&req.file_name);
                    std::fs::write(&local, bytes).unwrap();
                    results.push(LocalCopyResult::Success {
                        source_uri: req.uri.clone(),
                        local_uri: local,
                    });
                }
                None => results.push(LocalCopyResult::Error {
                    source_uri: req.uri.clone(),
                    copy_error: "provider refused".into(),
                }),
            }
        }
        Ok(results)
    }
}

pub fn local_file(path: &std::path::Path, mime: &str) -> PickedFile {
    PickedFile {
        uri: path.to_string_lossy().into_owned(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: std::fs::metadata(path).ok().map(|m| m.len()),
        mime_type: Some(mime.to_string()),
        is_virtual: false,
        convertible_to_mime_types: Vec::new(),
    }
}

pub fn virtual_file(uri: &str, name: &str, convertible: &[(&str, &str)]) -> PickedFile {
    PickedFile {
        uri: uri.to_string(),
        name: name.to_string(),
        size: None,
        mime_type: Some("application/vnd.google-apps.document".to_string()),
        is_virtual: true,
        convertible_to_mime_types: convertible
            .iter()
            .map(|(mime, ext)| ConvertibleType {
                mime_type: mime.to_string(),
                extension: ext.to_string(),
            })
            .collect(),
    }
}
