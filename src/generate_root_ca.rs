//! Root CA certificate generation.
//!
//! Generates the self-signed trust anchor at the top of a domain's hierarchy.
//!
//! # PKI Hierarchy Position
//! ```text
//! Root CA (self-signed) ← This module
//!   └── Intermediate CA (signed by Root)
//!       └── Host Certificate (signed by Intermediate)
//! ```
//!
//! # Certificate Properties
//! - **Self-signed**: issuer and subject are identical
//! - **Basic Constraints**: CA=true, pathlen=1 (signs intermediates only)
//! - **Key Usage**: keyCertSign, cRLSign, digitalSignature
//! - **Version**: X.509v3, SHA-256 signature, random 128-bit serial
//!
//! Key size and validity period come from the [`CaSpec`], defaulting to
//! RSA 4096-bit and 3650 days in the application configuration.

use anyhow::{anyhow, Result};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::x509::extension::{BasicConstraints, KeyUsage};
use openssl::x509::X509;

use crate::signing::{build_subject_name, generate_rsa_key, random_serial, CaSpec};

const X509_VERSION_3: i32 = 2; // X509 version 3 is represented by 2
const ROOT_CA_PATH_LENGTH: u32 = 1;

/// Generate a fresh RSA key pair and self-signed Root CA certificate.
///
/// The returned private key is the domain's long-lived trust anchor; the
/// caller persists it exactly once and never regenerates it while the files
/// are present.
pub fn generate_root_ca(spec: &CaSpec) -> Result<(PKey<Private>, X509)> {
    let private_key = generate_rsa_key(spec.key_bits)?;

    let mut builder =
        X509::builder().map_err(|e| anyhow!("Failed to create X509 builder: {}", e))?;

    builder
        .set_version(X509_VERSION_3)
        .map_err(|e| anyhow!("Failed to set version: {}", e))?;

    let serial = random_serial()?;
    builder
        .set_serial_number(&serial)
        .map_err(|e| anyhow!("Failed to set serial number: {}", e))?;

    let name = build_subject_name(&spec.subject)?;

    // Self-signed: subject and issuer are the same name
    builder
        .set_subject_name(&name)
        .map_err(|e| anyhow!("Failed to set subject: {}", e))?;
    builder
        .set_issuer_name(&name)
        .map_err(|e| anyhow!("Failed to set issuer: {}", e))?;

    let not_before = openssl::asn1::Asn1Time::days_from_now(0)
        .map_err(|e| anyhow!("Failed to create not_before: {}", e))?;
    builder
        .set_not_before(&not_before)
        .map_err(|e| anyhow!("Failed to set not_before: {}", e))?;

    let not_after = openssl::asn1::Asn1Time::days_from_now(spec.validity_days)
        .map_err(|e| anyhow!("Failed to create not_after: {}", e))?;
    builder
        .set_not_after(&not_after)
        .map_err(|e| anyhow!("Failed to set not_after: {}", e))?;

    builder
        .set_pubkey(&private_key)
        .map_err(|e| anyhow!("Failed to set public key: {}", e))?;

    let mut bc = BasicConstraints::new();
    bc.critical().ca();
    bc.pathlen(ROOT_CA_PATH_LENGTH);
    let extension = bc
        .build()
        .map_err(|e| anyhow!("Failed to build BasicConstraints: {}", e))?;
    builder
        .append_extension(extension)
        .map_err(|e| anyhow!("Failed to add BasicConstraints: {}", e))?;

    let mut ku = KeyUsage::new();
    ku.critical();
    ku.key_cert_sign();
    ku.crl_sign();
    ku.digital_signature();
    let ku_extension = ku
        .build()
        .map_err(|e| anyhow!("Failed to build KeyUsage: {}", e))?;
    builder
        .append_extension(ku_extension)
        .map_err(|e| anyhow!("Failed to add KeyUsage: {}", e))?;

    builder
        .sign(&private_key, MessageDigest::sha256())
        .map_err(|e| anyhow!("Failed to sign certificate: {}", e))?;

    Ok((private_key, builder.build()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::SubjectSpec;

    fn spec() -> CaSpec {
        CaSpec {
            subject: SubjectSpec {
                common_name: "Root CA.example.com".to_string(),
                country: "US".to_string(),
                state: "California".to_string(),
                locality: "San Francisco".to_string(),
                organization: "Example Corp".to_string(),
                organizational_unit: "PKI".to_string(),
            },
            validity_days: 3650,
            // Small key keeps the test fast; production uses 4096
            key_bits: 2048,
        }
    }

    #[test]
    fn test_root_ca_is_self_signed() {
        let (key, cert) = generate_root_ca(&spec()).unwrap();

        assert_eq!(
            cert.subject_name().entries().count(),
            cert.issuer_name().entries().count()
        );
        let cn = cert
            .subject_name()
            .entries_by_nid(openssl::nid::Nid::COMMONNAME)
            .next()
            .unwrap();
        assert_eq!(cn.data().as_utf8().unwrap().to_string(), "Root CA.example.com");

        // The certificate verifies under its own public key
        assert!(cert.verify(&key).unwrap());
    }
}
