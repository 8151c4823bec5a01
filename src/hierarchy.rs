//! CA hierarchy management.
//!
//! Idempotently ensures a domain's Root and Intermediate CA material exists,
//! calling the signing backend only for tiers that are `Missing`. Presence of
//! both the key and the certificate file is the sole idempotence check; once
//! a tier is `Present` its private key is never regenerated.
//!
//! The trust-chain artifact (`ca-chain.crt`, intermediate followed by root) is
//! rebuilt whenever it is absent, even when the Intermediate tier itself is
//! already `Present`. This recovers a chain file lost to a partial prior
//! run.
//!
//! When a domain borrows a parent's CA material this component is bypassed
//! entirely; the layout resolver has already verified both tiers exist.
//!
//! Failures are fatal and nothing is rolled back; re-running resumes from
//! whatever tier is already `Present`. Note there is no locking: two
//! concurrent invocations against one domain race on the same files.

use crate::configs::{CaPolicy, SubjectDefaults};
use crate::errors::Result;
use crate::layout::DomainLayout;
use crate::signing::{CaSpec, KeyCertPem, SigningBackend, SubjectSpec};
use crate::storage::{tier_state, Store, TierState};

/// What [`CaHierarchy::ensure`] actually did
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsureReport {
    pub root_generated: bool,
    pub intermediate_generated: bool,
    pub chain_rebuilt: bool,
}

/// Ensures Root and Intermediate CA material for domains that own their CAs
pub struct CaHierarchy<'a> {
    store: &'a dyn Store,
    backend: &'a dyn SigningBackend,
    subject: &'a SubjectDefaults,
    policy: &'a CaPolicy,
}

impl<'a> CaHierarchy<'a> {
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

    /// Ensure Root, then Intermediate, exist for this domain
    pub fn ensure(&self, layout: &DomainLayout) -> Result<EnsureReport> {
        let root_generated = self.ensure_root(layout)?;
        let (intermediate_generated, chain_rebuilt) = self.ensure_intermediate(layout)?;
        Ok(EnsureReport {
            root_generated,
            intermediate_generated,
            chain_rebuilt,
        })
    }

    /// Missing → generate a self-signed Root CA → Present.
    /// Present → skip silently, no cryptographic call.
    ///
    /// Returns true when material was generated.
    pub fn ensure_root(&self, layout: &DomainLayout) -> Result<bool> {
        let key_path = layout.root_key_path();
        let cert_path = layout.root_cert_path();
        if tier_state(self.store, &key_path, &cert_path) == TierState::Present {
            return Ok(false);
        }

        let spec = CaSpec {
            subject: self.tier_subject(format!("Root CA.{}", layout.domain)),
            validity_days: self.policy.root_validity_days,
            key_bits: self.policy.root_key_bits,
        };
        let material = self.backend.self_signed_root(&spec)?;
        self.store.write(&key_path, &material.key_pem)?;
        self.store.write(&cert_path, &material.cert_pem)?;
        Ok(true)
    }

    /// Missing → generate an Intermediate CA signed by the Root → Present.
    /// Also writes `ca-chain.crt` whenever that file is absent.
    ///
    /// Returns (intermediate generated, chain file written). The Root must
    /// already be Present.
    pub fn ensure_intermediate(&self, layout: &DomainLayout) -> Result<(bool, bool)> {
        let key_path = layout.intermediate_key_path();
        let cert_path = layout.intermediate_cert_path();

        let mut generated = false;
        if tier_state(self.store, &key_path, &cert_path) == TierState::Missing {
            let root = KeyCertPem {
                key_pem: self.store.read(&layout.root_key_path())?,
                cert_pem: self.store.read(&layout.root_cert_path())?,
            };
            let spec = CaSpec {
                subject: self.tier_subject(format!("Intermediate CA.{}", layout.domain)),
                validity_days: self.policy.intermediate_validity_days,
                key_bits: self.policy.intermediate_key_bits,
            };
            let material = self.backend.intermediate_signed_by_root(&spec, &root)?;
            self.store.write(&key_path, &material.key_pem)?;
            self.store.write(&cert_path, &material.cert_pem)?;
            generated = true;
        }

        let chain_path = layout.ca_chain_path();
        let mut chain_rebuilt = false;
        if !self.store.exists(&chain_path) {
            let mut chain = self.store.read(&cert_path)?;
            chain.extend_from_slice(&self.store.read(&layout.root_cert_path())?);
            self.store.write(&chain_path, &chain)?;
            chain_rebuilt = true;
        }

        Ok((generated, chain_rebuilt))
    }

    fn tier_subject(&self, common_name: String) -> SubjectSpec {
        SubjectSpec {
            common_name,
            country: self.subject.country.clone(),
            state: self.subject.state.clone(),
            locality: self.subject.locality.clone(),
            organization: self.subject.organization.clone(),
            organizational_unit: self.subject.organizational_unit.clone(),
        }
    }
}
