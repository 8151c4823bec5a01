//! Persistence layer for certificate material.
//!
//! The hierarchy manager never touches the filesystem directly: it works
//! against the [`Store`] trait, so tier-presence logic can be unit-tested
//! with an in-memory fake and no real key generation. [`DiskStore`] is the
//! production implementation over plain files.
//!
//! Tier presence is inferred from the filesystem: a CA tier is `Present`
//! exactly when both its private key and its certificate file exist. That
//! presence check is the sole idempotence guard for CA material.

use std::fs;
use std::path::Path;

use crate::errors::{PkiError, Result};

/// Whether a CA tier's material already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierState {
    Missing,
    Present,
}

/// Storage operations the hierarchy components need
pub trait Store {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

/// Filesystem-backed store
pub struct DiskStore;

impl Store for DiskStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| PkiError::filesystem(path, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).map_err(|e| PkiError::filesystem(path, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| PkiError::filesystem(path, e))
    }
}

/// Query a tier's state: `Present` only when both the private key and the
/// certificate file exist
pub fn tier_state(store: &dyn Store, key_path: &Path, cert_path: &Path) -> TierState {
    if store.exists(key_path) && store.exists(cert_path) {
        TierState::Present
    } else {
        TierState::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_state_requires_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore;
        let key = dir.path().join("ca.key");
        let cert = dir.path().join("ca.crt");

        assert_eq!(tier_state(&store, &key, &cert), TierState::Missing);

        store.write(&key, b"key material").unwrap();
        assert_eq!(tier_state(&store, &key, &cert), TierState::Missing);

        store.write(&cert, b"certificate").unwrap();
        assert_eq!(tier_state(&store, &key, &cert), TierState::Present);
    }

    #[test]
    fn test_disk_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore;
        let nested = dir.path().join("a/b");

        store.create_dir_all(&nested).unwrap();
        let file = nested.join("chain.crt");
        store.write(&file, b"pem bytes").unwrap();
        assert_eq!(store.read(&file).unwrap(), b"pem bytes");
    }

    #[test]
    fn test_read_missing_file_is_filesystem_error() {
        let store = DiskStore;
        let err = store.read(Path::new("/nonexistent/ca.key")).unwrap_err();
        assert!(matches!(err, PkiError::FileSystemError { .. }));
    }
}
