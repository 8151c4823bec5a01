//! Domain directory layout resolution.
//!
//! Maps a domain (and optional parent domain) to the three-tier directory
//! layout:
//!
//! ```text
//! <base>/<domain>/
//!   ca/            ca.key, ca.crt
//!   intermediate/  intermediate.key, intermediate.crt, ca-chain.crt
//!   certs/         <stem>.key, <stem>.crt, <stem>-fullchain.crt
//! ```
//!
//! A domain either owns its CA material or borrows it: with a parent domain,
//! the `ca/` and `intermediate/` handles point into the parent's tree and the
//! child only ever gets a `certs/` directory. The child never creates its own
//! CA directories in that mode, so trust roots cannot silently diverge.

use std::path::{Path, PathBuf};

use crate::errors::{PkiError, Result};
use crate::storage::Store;

pub const ROOT_KEY_FILE: &str = "ca.key";
pub const ROOT_CERT_FILE: &str = "ca.crt";
pub const INTERMEDIATE_KEY_FILE: &str = "intermediate.key";
pub const INTERMEDIATE_CERT_FILE: &str = "intermediate.crt";
pub const CA_CHAIN_FILE: &str = "ca-chain.crt";

/// Resolved directory handles for one domain
#[derive(Debug, Clone)]
pub struct DomainLayout {
    pub domain: String,
    pub ca_dir: PathBuf,
    pub intermediate_dir: PathBuf,
    pub certs_dir: PathBuf,
    /// False when CA material is borrowed from a parent domain
    pub owns_ca: bool,
}

impl DomainLayout {
    pub fn root_key_path(&self) -> PathBuf {
        self.ca_dir.join(ROOT_KEY_FILE)
    }

    pub fn root_cert_path(&self) -> PathBuf {
        self.ca_dir.join(ROOT_CERT_FILE)
    }

    pub fn intermediate_key_path(&self) -> PathBuf {
        self.intermediate_dir.join(INTERMEDIATE_KEY_FILE)
    }

    pub fn intermediate_cert_path(&self) -> PathBuf {
        self.intermediate_dir.join(INTERMEDIATE_CERT_FILE)
    }

    pub fn ca_chain_path(&self) -> PathBuf {
        self.intermediate_dir.join(CA_CHAIN_FILE)
    }
}

/// Resolve the directory layout for a domain.
///
/// Without a parent, all three directories live under `<base>/<domain>/` and
/// are created if absent. With a parent, the CA and Intermediate handles
/// point into the parent's tree; the parent must already own complete
/// Root and Intermediate key-and-certificate pairs or resolution fails with
/// [`PkiError::MissingParentCA`] before anything is created under the child.
pub fn resolve(
    store: &dyn Store,
    base_dir: &Path,
    domain: &str,
    parent: Option<&str>,
) -> Result<DomainLayout> {
    let domain_dir = base_dir.join(domain);

    match parent {
        None => {
            let layout = DomainLayout {
                domain: domain.to_string(),
                ca_dir: domain_dir.join("ca"),
                intermediate_dir: domain_dir.join("intermediate"),
                certs_dir: domain_dir.join("certs"),
                owns_ca: true,
            };
            store.create_dir_all(&layout.ca_dir)?;
            store.create_dir_all(&layout.intermediate_dir)?;
            store.create_dir_all(&layout.certs_dir)?;
            Ok(layout)
        }
        Some(parent) => {
            let parent_dir = base_dir.join(parent);
            let layout = DomainLayout {
                domain: domain.to_string(),
                ca_dir: parent_dir.join("ca"),
                intermediate_dir: parent_dir.join("intermediate"),
                certs_dir: domain_dir.join("certs"),
                owns_ca: false,
            };

            // Partial parent state is never auto-repaired from here; check
            // everything before touching the child's tree.
            let required = [
                layout.root_key_path(),
                layout.root_cert_path(),
                layout.intermediate_key_path(),
                layout.intermediate_cert_path(),
            ];
            let missing: Vec<String> = required
                .iter()
                .filter(|p| !store.exists(p))
                .map(|p| p.display().to_string())
                .collect();
            if !missing.is_empty() {
                return Err(PkiError::MissingParentCA {
                    domain: parent.to_string(),
                    detail: format!("missing {}", missing.join(", ")),
                });
            }

            store.create_dir_all(&layout.certs_dir)?;
            Ok(layout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DiskStore;

    #[test]
    fn test_own_domain_creates_three_dirs() {
        let base = tempfile::tempdir().unwrap();
        let layout = resolve(&DiskStore, base.path(), "example.com", None).unwrap();

        assert!(layout.owns_ca);
        assert!(layout.ca_dir.is_dir());
        assert!(layout.intermediate_dir.is_dir());
        assert!(layout.certs_dir.is_dir());
        assert_eq!(
            layout.root_key_path(),
            base.path().join("example.com/ca/ca.key")
        );
        assert_eq!(
            layout.ca_chain_path(),
            base.path().join("example.com/intermediate/ca-chain.crt")
        );
    }

    #[test]
    fn test_missing_parent_fails_and_creates_nothing() {
        let base = tempfile::tempdir().unwrap();
        let err = resolve(&DiskStore, base.path(), "child.example.com", Some("example.com"))
            .unwrap_err();

        assert!(matches!(err, PkiError::MissingParentCA { .. }));
        // Nothing appears under the child, not even certs/.
        assert!(!base.path().join("child.example.com").exists());
    }

    #[test]
    fn test_partial_parent_is_rejected() {
        let base = tempfile::tempdir().unwrap();
        let store = DiskStore;
        let parent_ca = base.path().join("example.com/ca");
        store.create_dir_all(&parent_ca).unwrap();
        store.write(&parent_ca.join(ROOT_KEY_FILE), b"key").unwrap();
        store.write(&parent_ca.join(ROOT_CERT_FILE), b"cert").unwrap();
        // No intermediate material at all.

        let err = resolve(&store, base.path(), "child.example.com", Some("example.com"))
            .unwrap_err();
        match err {
            PkiError::MissingParentCA { domain, detail } => {
                assert_eq!(domain, "example.com");
                assert!(detail.contains("intermediate.key"));
            }
            other => panic!("expected MissingParentCA, got {:?}", other),
        }
    }

    #[test]
    fn test_complete_parent_shares_ca_dirs() {
        let base = tempfile::tempdir().unwrap();
        let store = DiskStore;
        let parent = base.path().join("example.com");
        store.create_dir_all(&parent.join("ca")).unwrap();
        store.create_dir_all(&parent.join("intermediate")).unwrap();
        for file in [
            "ca/ca.key",
            "ca/ca.crt",
            "intermediate/intermediate.key",
            "intermediate/intermediate.crt",
        ] {
            store.write(&parent.join(file), b"pem").unwrap();
        }

        let layout =
            resolve(&store, base.path(), "child.example.com", Some("example.com")).unwrap();

        assert!(!layout.owns_ca);
        assert_eq!(layout.ca_dir, parent.join("ca"));
        assert_eq!(layout.intermediate_dir, parent.join("intermediate"));
        assert!(layout.certs_dir.is_dir());
        // The child never gets its own CA directories.
        assert!(!base.path().join("child.example.com/ca").exists());
        assert!(!base.path().join("child.example.com/intermediate").exists());
    }
}
