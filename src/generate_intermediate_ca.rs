//! Intermediate CA certificate generation.
//!
//! Generates the issuing tier that sits between a domain's Root CA and its
//! host certificates, so the Root key stays out of routine signing.
//!
//! # PKI Hierarchy Position
//! ```text
//! Root CA (self-signed)
//!   └── Intermediate CA (signed by Root) ← This module
//!       └── Host Certificate (signed by Intermediate)
//! ```
//!
//! # Certificate Properties
//! - **Signed by**: the Root CA key, issuer name taken from the Root certificate
//! - **Basic Constraints**: CA=true, pathlen=0, so the intermediate may only
//!   sign end-entity certificates, never further intermediates
//! - **Key Usage**: keyCertSign, cRLSign, digitalSignature

use anyhow::{anyhow, Result};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::x509::extension::{BasicConstraints, KeyUsage};
use openssl::x509::X509;

use crate::signing::{build_subject_name, generate_rsa_key, random_serial, CaSpec};

const X509_VERSION_3: i32 = 2; // X509 version 3 is represented by 2
const INTERMEDIATE_CA_PATH_LENGTH: u32 = 0;

/// Generate a fresh RSA key pair and Intermediate CA certificate signed by
/// the Root CA
pub fn generate_intermediate_ca(
    spec: &CaSpec,
    root_key: &PKey<Private>,
    root_cert: &X509,
) -> Result<(PKey<Private>, X509)> {
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

    let subject_name = build_subject_name(&spec.subject)?;
    builder
        .set_subject_name(&subject_name)
        .map_err(|e| anyhow!("Failed to set subject: {}", e))?;

    builder
        .set_issuer_name(root_cert.subject_name())
        .map_err(|e| anyhow!("Failed to set issuer from Root CA: {}", e))?;

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

    // pathlen=0: this CA signs host certificates only
    let mut bc = BasicConstraints::new();
    bc.critical().ca();
    bc.pathlen(INTERMEDIATE_CA_PATH_LENGTH);
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
        .sign(root_key, MessageDigest::sha256())
        .map_err(|e| anyhow!("Failed to sign certificate: {}", e))?;

    Ok((private_key, builder.build()))
}
