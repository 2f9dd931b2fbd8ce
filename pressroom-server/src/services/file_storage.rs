//! Upload storage
//!
//! Stores uploaded artifacts (proofs, approvals, design files) under the
//! work dir. Objects are addressed by a generated name; original names live
//! on the metadata row only.

use crate::utils::AppError;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Maximum upload size (20MB, print artwork can be large)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FileStorageService {
    root: PathBuf,
}

impl FileStorageService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Write bytes under `uploads/<order-key>/<uuid>.<ext>` and return the
    /// path relative to the uploads root.
    pub fn save(
        &self,
        order_key: &str,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "File too large, maximum is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_lowercase();
        let relative = format!("{}/{}.{}", sanitize_key(order_key), Uuid::new_v4(), ext);
        let full = self.root.join(&relative);

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::internal(format!("Failed to create upload dir: {}", e)))?;
        }
        fs::write(&full, data)
            .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))?;
        Ok(relative)
    }

    /// Absolute path of a stored object, refusing traversal outside the root
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, AppError> {
        if relative.contains("..") || relative.starts_with('/') {
            return Err(AppError::validation("Invalid file path"));
        }
        Ok(self.root.join(relative))
    }

    pub fn delete(&self, relative: &str) -> Result<(), AppError> {
        let full = self.resolve(relative)?;
        match fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("Failed to delete file: {}", e))),
        }
    }

    pub fn read(&self, relative: &str) -> Result<Vec<u8>, AppError> {
        let full = self.resolve(relative)?;
        fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::not_found("File not found"),
            _ => AppError::internal(format!("Failed to read file: {}", e)),
        })
    }

    pub fn mime_for(&self, file_name: &str) -> String {
        mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string()
    }
}

/// Record ids arrive as "order_record:xyz"; use only the key part in paths
fn sanitize_key(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_read_delete_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = FileStorageService::new(dir.path().to_path_buf());

        let rel = storage
            .save("order_record:abc", "proof.pdf", b"artwork")
            .unwrap();
        assert!(rel.starts_with("abc/"));
        assert!(rel.ends_with(".pdf"));
        assert_eq!(storage.read(&rel).unwrap(), b"artwork");

        storage.delete(&rel).unwrap();
        assert!(storage.read(&rel).is_err());
        // Deleting again is fine
        storage.delete(&rel).unwrap();
    }

    #[test]
    fn rejects_traversal() {
        let dir = tempdir().unwrap();
        let storage = FileStorageService::new(dir.path().to_path_buf());
        assert!(storage.resolve("../../etc/passwd").is_err());
        assert!(storage.resolve("/etc/passwd").is_err());
    }

    #[test]
    fn rejects_empty_and_oversized() {
        let dir = tempdir().unwrap();
        let storage = FileStorageService::new(dir.path().to_path_buf());
        assert!(storage.save("o", "a.pdf", b"").is_err());
    }
}
