//! Certificate inspection.
//!
//! Read-only reporting on an existing certificate file: subject, issuer,
//! validity window, and SAN entries. Formatting only; no hierarchy logic
//! lives here.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use openssl::nid::Nid;
use openssl::x509::{X509NameRef, X509};

/// Human-readable summary of one certificate
#[derive(Debug)]
pub struct CertificateReport {
    pub subject_common_name: String,
    pub issuer_common_name: String,
    pub not_before: String,
    pub not_after: String,
    pub subject_alt_names: Vec<String>,
}

impl fmt::Display for CertificateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject CN : {}", self.subject_common_name)?;
        writeln!(f, "Issuer CN  : {}", self.issuer_common_name)?;
        writeln!(f, "Not before : {}", self.not_before)?;
        writeln!(f, "Not after  : {}", self.not_after)?;
        if self.subject_alt_names.is_empty() {
            write!(f, "SANs       : (none)")?;
        } else {
            write!(f, "SANs       : {}", self.subject_alt_names.join(", "))?;
        }
        Ok(())
    }
}

/// Read and summarize a PEM certificate file
pub fn inspect_certificate(path: &Path) -> Result<CertificateReport> {
    let pem = fs::read(path)
        .context(format!("Failed to read certificate file: {}", path.display()))?;
    let cert = X509::from_pem(&pem).context("Failed to parse certificate PEM")?;

    let subject_alt_names = match cert.subject_alt_names() {
        Some(names) => names
            .iter()
            .filter_map(|n| n.dnsname().map(|s| s.to_string()))
            .collect(),
        None => Vec::new(),
    };

    Ok(CertificateReport {
        subject_common_name: common_name(cert.subject_name()),
        issuer_common_name: common_name(cert.issuer_name()),
        not_before: cert.not_before().to_string(),
        not_after: cert.not_after().to_string(),
        subject_alt_names,
    })
}

fn common_name(name: &X509NameRef) -> String {
    name.entries_by_nid(Nid::COMMONNAME)
        .next()
        .and_then(|e| e.data().as_utf8().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "(unset)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_root_ca::generate_root_ca;
    use crate::signing::{CaSpec, SubjectSpec};

    #[test]
    fn test_inspect_reports_subject_and_issuer() {
        let (_key, cert) = generate_root_ca(&CaSpec {
            subject: SubjectSpec {
                common_name: "Root CA.example.com".to_string(),
                country: "US".to_string(),
                state: "California".to_string(),
                locality: "San Francisco".to_string(),
                organization: "Example Corp".to_string(),
                organizational_unit: "PKI".to_string(),
            },
            validity_days: 10,
            key_bits: 2048,
        })
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ca.crt");
        fs::write(&path, cert.to_pem().unwrap()).unwrap();

        let report = inspect_certificate(&path).unwrap();
        assert_eq!(report.subject_common_name, "Root CA.example.com");
        // Self-signed: issuer matches subject
        assert_eq!(report.issuer_common_name, "Root CA.example.com");
        assert!(report.subject_alt_names.is_empty());
    }
}
