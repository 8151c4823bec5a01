//! Host (leaf) certificate generation.
//!
//! Generates TLS server certificates for host FQDNs, signed by a domain's
//! Intermediate CA, never by the Root directly.
//!
//! # PKI Hierarchy Position
//! ```text
//! Root CA (self-signed)
//!   └── Intermediate CA (signed by Root)
//!       └── Host Certificate (signed by Intermediate) ← This module
//! ```
//!
//! # Certificate Properties
//! - **Basic Constraints**: CA=false (end-entity)
//! - **Key Usage**: digitalSignature, keyEncipherment (critical)
//! - **Extended Key Usage**: serverAuth, clientAuth
//! - **Subject Alternative Name**: the request's DNS entries in order, primary
//!   FQDN first, with wildcard entries (`*.example.com`) included as given
//!
//! Key size defaults to RSA 2048-bit and validity to 825 days, both supplied
//! through the [`HostSpec`].

use anyhow::{anyhow, Result};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::x509::extension::{
    BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAlternativeName,
};
use openssl::x509::X509;

use crate::signing::{build_subject_name, generate_rsa_key, random_serial, HostSpec};

const X509_VERSION_3: i32 = 2; // X509 version 3 is represented by 2

/// Generate a fresh RSA key pair and host certificate signed by the
/// Intermediate CA.
///
/// Every call produces a brand-new key pair; callers that re-issue for the
/// same hostname discard the previous one.
pub fn generate_host_certificate(
    spec: &HostSpec,
    intermediate_key: &PKey<Private>,
    intermediate_cert: &X509,
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
        .set_issuer_name(intermediate_cert.subject_name())
        .map_err(|e| anyhow!("Failed to set issuer from Intermediate CA: {}", e))?;

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

    // CA=false: end-entity certificate
    let bc = BasicConstraints::new()
        .critical()
        .build()
        .map_err(|e| anyhow!("Failed to build BasicConstraints: {}", e))?;
    builder
        .append_extension(bc)
        .map_err(|e| anyhow!("Failed to add BasicConstraints: {}", e))?;

    let ku = KeyUsage::new()
        .critical()
        .digital_signature()
        .key_encipherment()
        .build()
        .map_err(|e| anyhow!("Failed to build KeyUsage: {}", e))?;
    builder
        .append_extension(ku)
        .map_err(|e| anyhow!("Failed to add KeyUsage: {}", e))?;

    let eku = ExtendedKeyUsage::new()
        .server_auth()
        .client_auth()
        .build()
        .map_err(|e| anyhow!("Failed to build ExtendedKeyUsage: {}", e))?;
    builder
        .append_extension(eku)
        .map_err(|e| anyhow!("Failed to add ExtendedKeyUsage: {}", e))?;

    let mut san = SubjectAlternativeName::new();
    for name in &spec.subject_alt_names {
        san.dns(name);
    }
    let san = san
        .build(&builder.x509v3_context(Some(intermediate_cert), None))
        .map_err(|e| anyhow!("Failed to build SubjectAlternativeName: {}", e))?;
    builder
        .append_extension(san)
        .map_err(|e| anyhow!("Failed to add SubjectAlternativeName: {}", e))?;

    builder
        .sign(intermediate_key, MessageDigest::sha256())
        .map_err(|e| anyhow!("Failed to sign certificate: {}", e))?;

    Ok((private_key, builder.build()))
}
