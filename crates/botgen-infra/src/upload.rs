//! Reading files from disk into [`UploadFile`]s.

use std::path::{Path, PathBuf};

use botgen_types::error::{UploadError, ValidationError};
use botgen_types::form::{UploadFile, VOICE_SAMPLE_EXTENSIONS};

/// Read one file, naming the upload after the file's base name.
pub async fn load_upload(path: &Path) -> Result<UploadFile, UploadError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| UploadError::NoFileName(path.display().to_string()))?
        .to_string();

    let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!(file = %name, bytes = bytes.len(), "Loaded upload");
    Ok(UploadFile::new(name, bytes))
}

/// Read knowledge base files. Any file type is accepted.
pub async fn load_knowledge_base_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>, UploadError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_upload(path).await?);
    }
    Ok(files)
}

/// Read voice samples, rejecting anything that isn't an mp3 or ogg before
/// touching the disk.
pub async fn load_voice_samples(paths: &[PathBuf]) -> Result<Vec<UploadFile>, UploadError> {
    for path in paths {
        let allowed = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| VOICE_SAMPLE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !allowed {
            return Err(ValidationError::UnsupportedVoiceSample {
                name: path.display().to_string(),
                allowed: VOICE_SAMPLE_EXTENSIONS.join(", "),
            }
            .into());
        }
    }
    load_knowledge_base_files(paths).await
}
