//! Host certificate issuance.
//!
//! Builds the certificate request for a leaf hostname (canonical FQDN plus
//! ordered SAN list), signs it against the domain's Intermediate CA, and
//! assembles the full chain artifact:
//!
//! ```text
//! <stem>-fullchain.crt = host certificate + intermediate + root
//! ```
//!
//! The concatenation order is load-bearing for TLS server chain
//! presentation and is preserved exactly.
//!
//! Unlike the CA tiers, issuance is not idempotent: re-invoking with the
//! same hostname always generates a fresh key pair and overwrites the key,
//! certificate, and chain files. Host certificates are cheap and short-lived;
//! CA material is neither.

use std::path::PathBuf;

use crate::configs::{CaPolicy, SubjectDefaults};
use crate::errors::{PkiError, Result};
use crate::layout::DomainLayout;
use crate::naming;
use crate::signing::{HostSpec, KeyCertPem, SigningBackend, SubjectSpec};
use crate::storage::{tier_state, Store, TierState};

/// Artifacts produced for one issued host certificate, for downstream
/// deployment tooling
#[derive(Debug, Clone)]
pub struct IssuedHost {
    pub fqdn: String,
    pub file_stem: String,
    pub subject_alt_names: Vec<String>,
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
    pub chain_path: PathBuf,
}

/// Issues leaf certificates against a resolved domain layout
pub struct HostCertIssuer<'a> {
    store: &'a dyn Store,
    backend: &'a dyn SigningBackend,
    subject: &'a SubjectDefaults,
    policy: &'a CaPolicy,
}

impl<'a> HostCertIssuer<'a> {
    pub fn new(
        store: &'a dyn Store,
        backend: &'a dyn SigningBackend,
        subject: &'a SubjectDefaults,
        policy: &'a CaPolicy,
    ) -> Self {
        Self {
            store,
            backend,
            subject,
            policy,
        }
    }

    /// Issue a certificate for a hostname token, overwriting any previous
    /// issuance for the same name.
    ///
    /// Fails with [`PkiError::MissingIntermediateCA`] when the Intermediate
    /// key-and-certificate pair is not present.
    pub fn issue(
        &self,
        layout: &DomainLayout,
        host_token: &str,
        alt_names: &[String],
    ) -> Result<IssuedHost> {
        let fqdn = naming::canonical_fqdn(host_token, &layout.domain);
        let file_stem = naming::file_stem(&fqdn);
        let subject_alt_names = naming::san_list(&fqdn, alt_names, &layout.domain);

        let int_key_path = layout.intermediate_key_path();
        let int_cert_path = layout.intermediate_cert_path();
        if tier_state(self.store, &int_key_path, &int_cert_path) == TierState::Missing {
            return Err(PkiError::MissingIntermediateCA(
                layout.intermediate_dir.clone(),
            ));
        }

        let intermediate = KeyCertPem {
            key_pem: self.store.read(&int_key_path)?,
            cert_pem: self.store.read(&int_cert_path)?,
        };

        let spec = HostSpec {
            subject: SubjectSpec {
                common_name: fqdn.clone(),
                country: self.subject.country.clone(),
                state: self.subject.state.clone(),
                locality: self.subject.locality.clone(),
                organization: self.subject.organization.clone(),
                organizational_unit: self.subject.organizational_unit.clone(),
            },
            subject_alt_names: subject_alt_names.clone(),
            validity_days: self.policy.host_validity_days,
            key_bits: self.policy.host_key_bits,
        };
        let material = self.backend.host_signed_by_intermediate(&spec, &intermediate)?;

        let key_path = layout.certs_dir.join(format!("{}.key", file_stem));
        let cert_path = layout.certs_dir.join(format!("{}.crt", file_stem));
        let chain_path = layout.certs_dir.join(format!("{}-fullchain.crt", file_stem));

        self.store.write(&key_path, &material.key_pem)?;
        self.store.write(&cert_path, &material.cert_pem)?;

        // leaf, then intermediate, then root
        let mut chain = material.cert_pem.clone();
        chain.extend_from_slice(&intermediate.cert_pem);
        chain.extend_from_slice(&self.store.read(&layout.root_cert_path())?);
        self.store.write(&chain_path, &chain)?;

        Ok(IssuedHost {
            fqdn,
            file_stem,
            subject_alt_names,
            key_path,
            cert_path,
            chain_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;
    use crate::signing::CaSpec;
    use crate::storage::DiskStore;
    use std::cell::Cell;
    use std::fs;

    /// Fake provider that mints a distinct key on every call, mirroring the
    /// fresh-keypair behavior of the real backend
    struct FakeBackend {
        calls: Cell<u32>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl SigningBackend for FakeBackend {
        fn self_signed_root(&self, _spec: &CaSpec) -> Result<KeyCertPem> {
            unreachable!("issuer never generates CA material")
        }

        fn intermediate_signed_by_root(
            &self,
            _spec: &CaSpec,
            _root: &KeyCertPem,
        ) -> Result<KeyCertPem> {
            unreachable!("issuer never generates CA material")
        }

        fn host_signed_by_intermediate(
            &self,
            spec: &HostSpec,
            _intermediate: &KeyCertPem,
        ) -> Result<KeyCertPem> {
            self.calls.set(self.calls.get() + 1);
            Ok(KeyCertPem {
                key_pem: format!("HOST KEY {} #{}\n", spec.subject.common_name, self.calls.get())
                    .into_bytes(),
                cert_pem: format!("HOST CERT {}\n", spec.subject.common_name).into_bytes(),
            })
        }
    }

    fn ca_files(layout: &layout::DomainLayout) {
        let store = DiskStore;
        store.write(&layout.root_key_path(), b"ROOT KEY\n").unwrap();
        store.write(&layout.root_cert_path(), b"ROOT CERT\n").unwrap();
        store
            .write(&layout.intermediate_key_path(), b"INT KEY\n")
            .unwrap();
        store
            .write(&layout.intermediate_cert_path(), b"INT CERT\n")
            .unwrap();
    }

    #[test]
    fn test_missing_intermediate_is_fatal() {
        let base = tempfile::tempdir().unwrap();
        let layout = layout::resolve(&DiskStore, base.path(), "example.com", None).unwrap();
        let backend = FakeBackend::new();
        let subject = SubjectDefaults::default();
        let policy = CaPolicy::default();

        let err = HostCertIssuer::new(&DiskStore, &backend, &subject, &policy)
            .issue(&layout, "www", &[])
            .unwrap_err();

        assert!(matches!(err, PkiError::MissingIntermediateCA(_)));
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn test_fullchain_is_leaf_intermediate_root() {
        let base = tempfile::tempdir().unwrap();
        let layout = layout::resolve(&DiskStore, base.path(), "example.com", None).unwrap();
        ca_files(&layout);
        let backend = FakeBackend::new();
        let subject = SubjectDefaults::default();
        let policy = CaPolicy::default();

        let issued = HostCertIssuer::new(&DiskStore, &backend, &subject, &policy)
            .issue(&layout, "www", &[])
            .unwrap();

        assert_eq!(issued.fqdn, "www.example.com");
        assert_eq!(issued.file_stem, "www.example.com");
        assert_eq!(
            fs::read(&issued.chain_path).unwrap(),
            b"HOST CERT www.example.com\nINT CERT\nROOT CERT\n"
        );
    }

    #[test]
    fn test_reissue_overwrites_with_fresh_key() {
        let base = tempfile::tempdir().unwrap();
        let layout = layout::resolve(&DiskStore, base.path(), "example.com", None).unwrap();
        ca_files(&layout);
        let backend = FakeBackend::new();
        let subject = SubjectDefaults::default();
        let policy = CaPolicy::default();
        let issuer = HostCertIssuer::new(&DiskStore, &backend, &subject, &policy);

        let first = issuer.issue(&layout, "www", &[]).unwrap();
        let first_key = fs::read(&first.key_path).unwrap();

        let second = issuer.issue(&layout, "www", &[]).unwrap();
        let second_key = fs::read(&second.key_path).unwrap();

        // Fresh key pair every invocation, identical names and SANs
        assert_ne!(first_key, second_key);
        assert_eq!(first.subject_alt_names, second.subject_alt_names);
        assert_eq!(first.key_path, second.key_path);
        assert_eq!(backend.calls.get(), 2);
    }

    #[test]
    fn test_wildcard_artifacts_use_wildcard_stem() {
        let base = tempfile::tempdir().unwrap();
        let layout = layout::resolve(&DiskStore, base.path(), "lab.test", None).unwrap();
        ca_files(&layout);
        let backend = FakeBackend::new();
        let subject = SubjectDefaults::default();
        let policy = CaPolicy::default();

        let alts = vec!["api.lab.test".to_string(), "*".to_string()];
        let issued = HostCertIssuer::new(&DiskStore, &backend, &subject, &policy)
            .issue(&layout, "*", &alts)
            .unwrap();

        assert_eq!(issued.fqdn, "*.lab.test");
        assert_eq!(issued.file_stem, "wildcard.lab.test");
        assert_eq!(
            issued.subject_alt_names,
            vec!["*.lab.test", "api.lab.test", "*.lab.test"]
        );
        assert!(issued
            .chain_path
            .ends_with("certs/wildcard.lab.test-fullchain.crt"));
    }
}
