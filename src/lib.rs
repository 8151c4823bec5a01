//! pki-domains - Per-Domain Certificate Trust Hierarchies
//!
//! Manages a local certificate trust hierarchy per logical domain: a
//! self-signed Root CA, an Intermediate CA signed by it, and host (leaf)
//! certificates signed by the Intermediate.
//!
//! ```text
//! Root CA (self-signed, pathlen=1)          domains/<domain>/ca/
//!   └── Intermediate CA (pathlen=0)         domains/<domain>/intermediate/
//!       └── Host Certificate (CA=false)     domains/<domain>/certs/
//! ```
//!
//! A domain either owns its CA material or borrows the `ca/` and
//! `intermediate/` trees of a parent domain; in the latter case only host
//! certificates are written under the child.
//!
//! # Behavior Contract
//!
//! - CA material is **idempotent**: generation happens only when a tier's
//!   key and certificate files are both absent, and an existing private key
//!   is never silently regenerated.
//! - Host issuance is **not idempotent**: every invocation mints a fresh
//!   key pair and overwrites the previous artifacts for that hostname.
//! - Chain artifacts have fixed, load-bearing order: `ca-chain.crt` is
//!   intermediate then root, and `<stem>-fullchain.crt` is
//!   leaf, then intermediate, then root.
//!
//! # Module Overview
//!
//! - [`naming`]: wildcard/FQDN canonicalization, filename stems, SAN lists
//! - [`layout`]: per-domain directory resolution and parent CA sharing
//! - [`hierarchy`]: idempotent Root/Intermediate generation and the trust
//!   chain artifact
//! - [`issuer`]: host certificate issuance and full-chain assembly
//! - [`storage`]: the `Store` seam and file-presence tier states
//! - [`signing`]: the cryptographic provider seam (openssl in production)
//! - [`generate_root_ca`], [`generate_intermediate_ca`],
//!   [`generate_host_cert`]: the X.509v3 builders behind the openssl backend
//! - [`configs`]: subject defaults, key sizes, validity periods
//! - [`inspect`]: read-only certificate reporting
//! - [`errors`]: the fatal error kinds
//!
//! # Example
//!
//! ```no_run
//! use pki_domains::configs::AppConfig;
//! use pki_domains::hierarchy::CaHierarchy;
//! use pki_domains::issuer::HostCertIssuer;
//! use pki_domains::signing::OpensslBackend;
//! use pki_domains::storage::DiskStore;
//! use pki_domains::{layout, errors::Result};
//!
//! fn example() -> Result<()> {
//!     let config = AppConfig::default();
//!     let store = DiskStore;
//!     let backend = OpensslBackend;
//!
//!     let layout = layout::resolve(&store, &config.layout.base_dir, "example.com", None)?;
//!     CaHierarchy::new(&store, &backend, &config.subject, &config.policy).ensure(&layout)?;
//!
//!     let issued = HostCertIssuer::new(&store, &backend, &config.subject, &config.policy)
//!         .issue(&layout, "www", &[])?;
//!     println!("full chain at {}", issued.chain_path.display());
//!     Ok(())
//! }
//! ```

pub mod configs;
pub mod errors;
pub mod generate_host_cert;
pub mod generate_intermediate_ca;
pub mod generate_root_ca;
pub mod hierarchy;
pub mod inspect;
pub mod issuer;
pub mod layout;
pub mod naming;
pub mod signing;
pub mod storage;
