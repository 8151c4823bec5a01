//! pki-domains - Per-Domain Certificate Trust Hierarchies
//!
//! Command-line front end. Establishes directories for a domain, ensures its
//! Root and Intermediate CA material exists (or borrows a parent domain's),
//! and optionally issues a host certificate with its full chain:
//!
//! ```bash
//! # CA material only
//! pki-domains generate --domain example.com
//!
//! # Wildcard host certificate with an extra SAN
//! pki-domains generate --domain example.com --host '*' --alt-names api
//!
//! # Child domain borrowing example.com's CAs
//! pki-domains generate --domain dev.example.com --parent example.com --host www
//!
//! # Validity report for any certificate file
//! pki-domains inspect domains/example.com/ca/ca.crt
//! ```
//!
//! Missing required values are prompted for interactively; `--batch`
//! disables prompting and fails fast instead. Exit code is zero on success
//! (including CA-only runs) and non-zero on any fatal error.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use pki_domains::configs::AppConfig;
use pki_domains::errors::PkiError;
use pki_domains::hierarchy::CaHierarchy;
use pki_domains::inspect::inspect_certificate;
use pki_domains::issuer::HostCertIssuer;
use pki_domains::layout;
use pki_domains::signing::OpensslBackend;
use pki_domains::storage::DiskStore;

#[derive(Parser)]
#[command(
    name = "pki-domains",
    version,
    about = "Per-domain local certificate trust hierarchies"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ensure CA material for a domain and optionally issue a host certificate
    Generate(GenerateArgs),
    /// Report subject, issuer, validity dates, and SANs of a certificate file
    Inspect {
        /// Path to a PEM certificate
        cert: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Domain the hierarchy belongs to (prompted for when omitted)
    #[arg(long)]
    domain: Option<String>,

    /// Hostname token; '*' issues a wildcard certificate, omit for CA-only
    #[arg(long)]
    host: Option<String>,

    /// Additional subject alternative names, normalized like the hostname
    #[arg(long = "alt-names", num_args = 1..)]
    alt_names: Vec<String>,

    /// Borrow Root/Intermediate CA material from this parent domain
    #[arg(long)]
    parent: Option<String>,

    /// Subject country override
    #[arg(long)]
    country: Option<String>,

    /// Subject state/province override
    #[arg(long)]
    state: Option<String>,

    /// Subject city override
    #[arg(long)]
    city: Option<String>,

    /// Subject organization override
    #[arg(long)]
    org: Option<String>,

    /// Base directory for domain trees (default: domains/)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Configuration file (default: pki-domains.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Non-interactive mode: never prompt, fail fast on missing values
    #[arg(long)]
    batch: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Inspect { cert } => {
            let report = inspect_certificate(&cert)?;
            println!("{}", report);
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    if let Some(country) = args.country {
        config.subject.country = country;
    }
    if let Some(state) = args.state {
        config.subject.state = state;
    }
    if let Some(city) = args.city {
        config.subject.locality = city;
    }
    if let Some(org) = args.org {
        config.subject.organization = org;
    }
    if let Some(base_dir) = args.base_dir {
        config.layout.base_dir = base_dir;
    }

    let domain = match args.domain {
        Some(domain) => domain,
        None if args.batch => anyhow::bail!("--domain is required in non-interactive mode"),
        None => prompt_required("Domain")?,
    };

    let host = resolve_host(args.host, &args.alt_names, args.batch)?;

    let store = DiskStore;
    let backend = OpensslBackend;
    let layout = layout::resolve(
        &store,
        &config.layout.base_dir,
        &domain,
        args.parent.as_deref(),
    )?;

    if layout.owns_ca {
        let report =
            CaHierarchy::new(&store, &backend, &config.subject, &config.policy).ensure(&layout)?;
        if report.root_generated {
            println!("✓ Root CA generated");
        } else {
            println!("✓ Root CA already present, reusing");
        }
        if report.intermediate_generated {
            println!("✓ Intermediate CA generated");
        } else {
            println!("✓ Intermediate CA already present, reusing");
        }
        if report.chain_rebuilt {
            println!("✓ CA chain written to {}", layout.ca_chain_path().display());
        }
    } else {
        println!(
            "✓ Using CA material from parent domain '{}'",
            args.parent.as_deref().unwrap_or_default()
        );
    }

    match host {
        Some(host) => {
            let issued = HostCertIssuer::new(&store, &backend, &config.subject, &config.policy)
                .issue(&layout, &host, &args.alt_names)?;
            println!("✓ Issued certificate for {}", issued.fqdn);
            println!("  SANs:       {}", issued.subject_alt_names.join(", "));
            println!("  key:        {}", issued.key_path.display());
            println!("  cert:       {}", issued.cert_path.display());
            println!("  full chain: {}", issued.chain_path.display());
        }
        None => println!("No hostname requested; CA material only."),
    }

    Ok(())
}

/// Decide whether this run issues a host certificate.
///
/// Alternate names without a hostname imply host issuance was intended, so
/// batch mode fails fast with `MissingHostname`; interactive mode asks.
fn resolve_host(
    host: Option<String>,
    alt_names: &[String],
    batch: bool,
) -> Result<Option<String>> {
    if let Some(host) = host {
        return Ok(Some(host));
    }
    if batch {
        if alt_names.is_empty() {
            return Ok(None);
        }
        return Err(PkiError::MissingHostname.into());
    }
    let answer = prompt("Hostname (leave empty for CA material only)")?;
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer))
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_required(label: &str) -> Result<String> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("A value is required.");
    }
}
