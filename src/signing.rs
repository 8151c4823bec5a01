//! Cryptographic provider seam.
//!
//! The hierarchy manager and host issuer never call openssl directly: they
//! describe *what* to sign through [`CaSpec`]/[`HostSpec`] and hand it to a
//! [`SigningBackend`]. [`OpensslBackend`] is the production implementation,
//! driving the `generate_*` modules and returning PEM-encoded material;
//! tests substitute a fake backend to exercise the state machine without
//! real key generation.

use anyhow::{anyhow, Result as CryptoResult};
use openssl::asn1::Asn1Integer;
use openssl::bn::{BigNum, MsbOption};
use openssl::pkey::{PKey, Private};
use openssl::x509::{X509, X509Name};

use crate::errors::{PkiError, Result};
use crate::generate_host_cert::generate_host_certificate;
use crate::generate_intermediate_ca::generate_intermediate_ca;
use crate::generate_root_ca::generate_root_ca;

/// Distinguished-name fields for one certificate
#[derive(Debug, Clone)]
pub struct SubjectSpec {
    pub common_name: String,
    pub country: String,
    pub state: String,
    pub locality: String,
    pub organization: String,
    pub organizational_unit: String,
}

/// Request for a CA-tier certificate (Root or Intermediate)
#[derive(Debug, Clone)]
pub struct CaSpec {
    pub subject: SubjectSpec,
    pub validity_days: u32,
    pub key_bits: u32,
}

/// Request for a host (leaf) certificate
#[derive(Debug, Clone)]
pub struct HostSpec {
    /// Subject; the common name is the primary FQDN
    pub subject: SubjectSpec,
    /// Ordered DNS SAN entries, primary FQDN first
    pub subject_alt_names: Vec<String>,
    pub validity_days: u32,
    pub key_bits: u32,
}

/// PEM-encoded private key and certificate pair
#[derive(Debug, Clone)]
pub struct KeyCertPem {
    pub key_pem: Vec<u8>,
    pub cert_pem: Vec<u8>,
}

/// The external cryptographic provider: key generation and signing.
///
/// Every method is synchronous and fatal on failure; callers never retry.
pub trait SigningBackend {
    /// Generate a self-signed Root CA key pair and certificate
    fn self_signed_root(&self, spec: &CaSpec) -> Result<KeyCertPem>;

    /// Generate an Intermediate CA key pair and certificate signed by the Root
    fn intermediate_signed_by_root(&self, spec: &CaSpec, root: &KeyCertPem)
        -> Result<KeyCertPem>;

    /// Generate a host key pair and certificate signed by the Intermediate
    fn host_signed_by_intermediate(
        &self,
        spec: &HostSpec,
        intermediate: &KeyCertPem,
    ) -> Result<KeyCertPem>;
}

/// Production backend built on openssl
pub struct OpensslBackend;

impl SigningBackend for OpensslBackend {
    fn self_signed_root(&self, spec: &CaSpec) -> Result<KeyCertPem> {
        let (key, cert) = generate_root_ca(spec).map_err(signing_failure)?;
        encode_pem(&key, &cert)
    }

    fn intermediate_signed_by_root(
        &self,
        spec: &CaSpec,
        root: &KeyCertPem,
    ) -> Result<KeyCertPem> {
        let (root_key, root_cert) = decode_pem(root)?;
        let (key, cert) =
            generate_intermediate_ca(spec, &root_key, &root_cert).map_err(signing_failure)?;
        encode_pem(&key, &cert)
    }

    fn host_signed_by_intermediate(
        &self,
        spec: &HostSpec,
        intermediate: &KeyCertPem,
    ) -> Result<KeyCertPem> {
        let (int_key, int_cert) = decode_pem(intermediate)?;
        let (key, cert) =
            generate_host_certificate(spec, &int_key, &int_cert).map_err(signing_failure)?;
        encode_pem(&key, &cert)
    }
}

fn signing_failure(e: anyhow::Error) -> PkiError {
    PkiError::SigningFailure(format!("{:#}", e))
}

fn encode_pem(key: &PKey<Private>, cert: &X509) -> Result<KeyCertPem> {
    let key_pem = key
        .private_key_to_pem_pkcs8()
        .map_err(|e| PkiError::SigningFailure(format!("Failed to encode private key: {}", e)))?;
    let cert_pem = cert
        .to_pem()
        .map_err(|e| PkiError::SigningFailure(format!("Failed to encode certificate: {}", e)))?;
    Ok(KeyCertPem { key_pem, cert_pem })
}

fn decode_pem(material: &KeyCertPem) -> Result<(PKey<Private>, X509)> {
    let key = PKey::private_key_from_pem(&material.key_pem)
        .map_err(|e| PkiError::SigningFailure(format!("Failed to parse signing key: {}", e)))?;
    let cert = X509::from_pem(&material.cert_pem).map_err(|e| {
        PkiError::SigningFailure(format!("Failed to parse signing certificate: {}", e))
    })?;
    Ok((key, cert))
}

// Shared X.509 plumbing for the generate_* modules.

pub(crate) fn generate_rsa_key(bits: u32) -> CryptoResult<PKey<Private>> {
    let rsa = openssl::rsa::Rsa::generate(bits)
        .map_err(|e| anyhow!("Failed to generate RSA keypair: {}", e))?;
    PKey::from_rsa(rsa).map_err(|e| anyhow!("Failed to create private key: {}", e))
}

/// Random 128-bit serial number
pub(crate) fn random_serial() -> CryptoResult<Asn1Integer> {
    let mut serial = BigNum::new()?;
    serial.rand(128, MsbOption::MAYBE_ZERO, false)?;
    Ok(serial.to_asn1_integer()?)
}

pub(crate) fn build_subject_name(subject: &SubjectSpec) -> CryptoResult<X509Name> {
    let mut name_builder = X509Name::builder()
        .map_err(|e| anyhow!("Failed to create name builder: {}", e))?;
    name_builder
        .append_entry_by_nid(openssl::nid::Nid::COMMONNAME, &subject.common_name)
        .map_err(|e| anyhow!("Failed to set CN: {}", e))?;
    name_builder
        .append_entry_by_nid(openssl::nid::Nid::ORGANIZATIONNAME, &subject.organization)
        .map_err(|e| anyhow!("Failed to set organization: {}", e))?;
    name_builder
        .append_entry_by_nid(
            openssl::nid::Nid::ORGANIZATIONALUNITNAME,
            &subject.organizational_unit,
        )
        .map_err(|e| anyhow!("Failed to set organizational unit: {}", e))?;
    name_builder
        .append_entry_by_nid(openssl::nid::Nid::LOCALITYNAME, &subject.locality)
        .map_err(|e| anyhow!("Failed to set locality: {}", e))?;
    name_builder
        .append_entry_by_nid(openssl::nid::Nid::STATEORPROVINCENAME, &subject.state)
        .map_err(|e| anyhow!("Failed to set state/province: {}", e))?;
    name_builder
        .append_entry_by_nid(openssl::nid::Nid::COUNTRYNAME, &subject.country)
        .map_err(|e| anyhow!("Failed to set country: {}", e))?;
    Ok(name_builder.build())
}
