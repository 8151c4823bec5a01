//! Hostname and SAN normalization.
//!
//! Turns a raw hostname token plus a domain into a canonical FQDN and a
//! filesystem-safe filename stem, and builds the ordered Subject Alternative
//! Name list for a host certificate. These rules decide exactly what the
//! signing layer is asked to put on the certificate:
//!
//! - `*` becomes `*.<domain>`
//! - `*.anything` passes through unchanged (a fully specified wildcard,
//!   possibly for another domain)
//! - a `*` glued to text without a dot (`*api`) is coerced to `*.<domain>`;
//!   the suffix text is discarded
//! - a token containing a dot is treated as a complete FQDN and passes
//!   through unchanged
//! - anything else becomes `<token>.<domain>`

/// The wildcard marker accepted as a hostname token
pub const WILDCARD: &str = "*";

/// Canonicalize a raw hostname token against a domain.
///
/// # Example
/// ```
/// use pki_domains::naming::canonical_fqdn;
///
/// assert_eq!(canonical_fqdn("*", "lab.test"), "*.lab.test");
/// assert_eq!(canonical_fqdn("api", "lab.test"), "api.lab.test");
/// assert_eq!(canonical_fqdn("db.other.test", "lab.test"), "db.other.test");
/// ```
pub fn canonical_fqdn(token: &str, domain: &str) -> String {
    if token == WILDCARD {
        return format!("*.{}", domain);
    }
    if let Some(rest) = token.strip_prefix('*') {
        if rest.starts_with('.') {
            // Fully specified wildcard, keep as given
            return token.to_string();
        }
        // Malformed wildcard: the text after the marker is dropped
        return format!("*.{}", domain);
    }
    if token.contains('.') {
        return token.to_string();
    }
    format!("{}.{}", token, domain)
}

/// Derive the filesystem-safe stem all artifact files for a certificate use.
///
/// A leading `*.` is replaced by the literal word `wildcard.` so wildcard
/// certificates get valid filenames (`wildcard.lab.test.key` and friends).
pub fn file_stem(fqdn: &str) -> String {
    match fqdn.strip_prefix("*.") {
        Some(rest) => format!("wildcard.{}", rest),
        None => fqdn.to_string(),
    }
}

/// Build the ordered SAN list for a host certificate.
///
/// The primary FQDN is always entry one; alternate names follow in the order
/// given, each passed through the same wildcard normalization. Duplicates and
/// names conflicting with the primary are recorded as given.
pub fn san_list(fqdn: &str, alt_names: &[String], domain: &str) -> Vec<String> {
    let mut sans = Vec::with_capacity(1 + alt_names.len());
    sans.push(fqdn.to_string());
    for alt in alt_names {
        sans.push(canonical_fqdn(alt, domain));
    }
    sans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_marker_expands_to_domain() {
        assert_eq!(canonical_fqdn("*", "example.com"), "*.example.com");
    }

    #[test]
    fn test_specified_wildcard_passes_through() {
        assert_eq!(canonical_fqdn("*.other.net", "example.com"), "*.other.net");
    }

    #[test]
    fn test_glued_wildcard_discards_suffix() {
        // Documented quirk: "*api" is not "*.api.example.com" or an error,
        // the suffix text is dropped entirely.
        assert_eq!(canonical_fqdn("*api", "example.com"), "*.example.com");
        assert_eq!(canonical_fqdn("*foo-bar", "example.com"), "*.example.com");
    }

    #[test]
    fn test_dotted_token_is_complete_fqdn() {
        assert_eq!(canonical_fqdn("www.example.com", "example.com"), "www.example.com");
        assert_eq!(canonical_fqdn("db.other.test", "example.com"), "db.other.test");
    }

    #[test]
    fn test_bare_token_joins_domain() {
        assert_eq!(canonical_fqdn("mail", "example.com"), "mail.example.com");
    }

    #[test]
    fn test_file_stem_replaces_wildcard() {
        assert_eq!(file_stem("*.example.com"), "wildcard.example.com");
        assert_eq!(file_stem("mail.example.com"), "mail.example.com");
    }

    #[test]
    fn test_san_list_preserves_order_and_duplicates() {
        let fqdn = canonical_fqdn("*", "lab.test");
        assert_eq!(fqdn, "*.lab.test");
        assert_eq!(file_stem(&fqdn), "wildcard.lab.test");

        let alts = vec!["api.lab.test".to_string(), "*".to_string()];
        let sans = san_list(&fqdn, &alts, "lab.test");
        assert_eq!(sans, vec!["*.lab.test", "api.lab.test", "*.lab.test"]);
    }
}
