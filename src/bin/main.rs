//! Sigval Trust CLI
//!
//! Command-line front end for trust-list reloads and certificate attribute
//! inspection.

use clap::{Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use sigval_trust::infra::config::{self, ConfigManager, ExportFormat, TrustConfiguration};
use sigval_trust::services::{load_certificate, resolve_location};
use sigval_trust::{
    AttributeReference, AttributeSource, CertificateAttributeReader, CmsCertificateExtractor,
    ExtensionAttributeResolver, TrustAnchorReloader,
};

#[derive(Parser)]
#[command(name = "sigval-trust")]
#[command(about = "Trust-list resolution and certificate attribute extraction")]
#[command(long_about = "
Sigval Trust - trust anchors and certificate attributes for signature validation

EXAMPLES:
    # Reload trust anchors from the configured policy root
    sigval-trust reload

    # Show where a policy root publishes its trust list
    sigval-trust location policy-root.crt

    # List the certificates carried by a downloaded trust list
    sigval-trust extract trust-list.p7b

    # Resolve the date of birth from SubjectDirectoryAttributes
    sigval-trust resolve signer.crt --source sda --key 1.3.6.1.5.5.7.9.1

ENVIRONMENT VARIABLES:
    RUST_LOG        Logging level (debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one trust-anchor reload cycle and print the snapshot
    Reload {
        /// Configuration file (defaults to the user config directory)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Policy root certificate (overrides config)
        #[arg(long, value_name = "CERT")]
        policy_root: Option<PathBuf>,
    },

    /// Extract the certificates of a DER CMS trust list
    Extract {
        #[arg(value_name = "BLOB")]
        blob: PathBuf,
    },

    /// Print the CA-repository location published by a policy root
    Location {
        #[arg(value_name = "CERT")]
        certificate: PathBuf,
    },

    /// Print the subject DN attributes of a certificate
    Attributes {
        #[arg(value_name = "CERT")]
        certificate: PathBuf,
    },

    /// Resolve one attribute by source and reference key
    Resolve {
        #[arg(value_name = "CERT")]
        certificate: PathBuf,

        /// Attribute source
        #[arg(short, long, value_enum)]
        source: SourceArg,

        /// OID for rdn/sda, GeneralName tag number for san
        #[arg(short, long)]
        key: String,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Create default configuration file
    Init,

    /// Export configuration
    Export {
        /// Export format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ExportFormatArg,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum SourceArg {
    Rdn,
    San,
    Sda,
}

impl From<SourceArg> for AttributeSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Rdn => AttributeSource::Rdn,
            SourceArg::San => AttributeSource::San,
            SourceArg::Sda => AttributeSource::Sda,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum ExportFormatArg {
    Toml,
    Json,
    Yaml,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Toml => ExportFormat::Toml,
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Yaml => ExportFormat::Yaml,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reload {
            config,
            policy_root,
        } => handle_reload_command(config, policy_root)?,
        Commands::Extract { blob } => handle_extract_command(&blob)?,
        Commands::Location { certificate } => handle_location_command(&certificate)?,
        Commands::Attributes { certificate } => handle_attributes_command(&certificate)?,
        Commands::Resolve {
            certificate,
            source,
            key,
        } => handle_resolve_command(&certificate, source, &key)?,
        Commands::Config(config_cmd) => handle_config_command(config_cmd)?,
    }

    Ok(())
}

fn config_manager(path: Option<PathBuf>) -> Result<ConfigManager> {
    match path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => ConfigManager::new().into_diagnostic(),
    }
}

fn handle_reload_command(config_path: Option<PathBuf>, policy_root: Option<PathBuf>) -> Result<()> {
    let manager = config_manager(config_path)?;
    let mut config = if manager.config_path().exists() {
        manager.load().into_diagnostic()?
    } else {
        log::info!(
            "No configuration at {}, using defaults",
            manager.config_path().display()
        );
        TrustConfiguration::default()
    };
    if policy_root.is_some() {
        config.policy_root = policy_root;
    }
    if config.policy_root.is_none() {
        log::warn!("No policy root configured; the snapshot will only hold trusted-folder certificates");
    }

    let reloader = TrustAnchorReloader::from_config(&config)
        .into_diagnostic()
        .wrap_err("Failed to set up trust anchor reloader")?;
    let snapshot = reloader
        .reload()
        .into_diagnostic()
        .wrap_err("Trust anchor reload failed")?;

    println!(
        "Trust anchor snapshot v{} ({} certificates)",
        snapshot.version(),
        snapshot.len()
    );
    for summary in snapshot.summaries() {
        println!("  {}", summary.subject);
        println!("    SHA-256: {}", summary.sha256_fingerprint);
    }
    println!(
        "Next reload due in {}s",
        reloader.reload_interval().as_secs()
    );
    Ok(())
}

fn handle_extract_command(blob: &Path) -> Result<()> {
    let bytes = std::fs::read(blob)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", blob.display()))?;
    let extracted = CmsCertificateExtractor::extract(&bytes).into_diagnostic()?;

    println!("Extracted {} certificate(s)", extracted.len());
    for (idx, certificate) in extracted.iter().enumerate() {
        println!("  [{idx}] {}", certificate.tbs_certificate.subject);
    }
    if !extracted.skipped().is_empty() {
        println!("Skipped {} entries:", extracted.skipped().len());
        for skipped in extracted.skipped() {
            println!("  [{}] {}", skipped.index, skipped.reason);
        }
    }
    Ok(())
}

fn handle_location_command(path: &Path) -> Result<()> {
    let certificate = load_certificate(path).into_diagnostic()?;
    match resolve_location(&certificate).into_diagnostic()? {
        Some(url) => println!("{url}"),
        None => println!("none"),
    }
    Ok(())
}

fn handle_attributes_command(path: &Path) -> Result<()> {
    use der::Encode;

    let certificate = load_certificate(path).into_diagnostic()?;
    let der = certificate.to_der().into_diagnostic()?;
    let attributes = CertificateAttributeReader::read_subject_attributes(&der).into_diagnostic()?;

    for (attribute, value) in attributes.iter() {
        println!("{:<24} {value}", attribute.short_name());
    }
    for entry in attributes.unrecognized() {
        let name = const_oid::db::DB.by_oid(&entry.oid).unwrap_or("unrecognized");
        println!("{:<24} {} ({name})", entry.oid, entry.value);
    }
    Ok(())
}

fn handle_resolve_command(path: &Path, source: SourceArg, key: &str) -> Result<()> {
    let certificate = load_certificate(path).into_diagnostic()?;
    let reference = AttributeReference::new(source.into(), key).into_diagnostic()?;
    match ExtensionAttributeResolver::resolve(&certificate, &reference).into_diagnostic()? {
        Some(value) => println!("{value}"),
        None => println!("No value for {reference}"),
    }
    Ok(())
}

fn handle_config_command(config_cmd: ConfigCommands) -> Result<()> {
    let manager = ConfigManager::new().into_diagnostic()?;

    match config_cmd {
        ConfigCommands::Show => {
            if manager.config_path().exists() {
                let config = manager.load().into_diagnostic()?;
                println!("Configuration ({}):", manager.config_path().display());
                println!("{}", config::export(&config, ExportFormat::Toml).into_diagnostic()?);
            } else {
                println!("No configuration file found. Use 'config init' to create one.");
            }
        }

        ConfigCommands::Init => {
            let config = TrustConfiguration::default();
            manager.save(&config).into_diagnostic()?;
            println!(
                "Created default configuration at: {}",
                manager.config_path().display()
            );
            println!("   Set policy_root to the policy root certificate before reloading.");
        }

        ConfigCommands::Export { format, output } => {
            let content = manager.export_config(format.into()).into_diagnostic()?;

            if let Some(output_path) = output {
                std::fs::write(&output_path, content)
                    .into_diagnostic()
                    .wrap_err("Failed to write export file")?;
                println!("Configuration exported to: {}", output_path.display());
            } else {
                println!("{content}");
            }
        }
    }

    Ok(())
}
