//! Command-line interface for wcs10

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use wcs10::codec::{Codec, CodecConfig, ReadMode};
#[cfg(feature = "cli")]
use wcs10::schema::Registry;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "wcs10")]
#[command(author, version, about = "WCS 1.0 document reader and writer", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the registry's types, enumerations and global elements
    Inspect {
        /// Show the features of a single type
        #[arg(short = 't', long)]
        type_name: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Read a document and report problems
    Check {
        /// Path to the XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Read mode: strict, lax or skip
        #[arg(short, long, default_value = "strict")]
        mode: String,
    },

    /// Read a document and write it back
    Roundtrip {
        /// Path to the XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write on a single line
        #[arg(long)]
        compact: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { type_name, json } => cmd_inspect(type_name, json),
        Commands::Check { file, mode } => cmd_check(file, mode),
        Commands::Roundtrip {
            file,
            output,
            compact,
        } => cmd_roundtrip(file, output, compact),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[cfg(feature = "cli")]
fn cmd_inspect(type_name: Option<String>, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::wcs10()?;
    let dump = registry.dump();

    if let Some(name) = type_name {
        let info = dump
            .type_info(&name)
            .ok_or_else(|| format!("Unknown type: {}", name))?;
        if json_output {
            println!("{}", serde_json::to_string_pretty(info)?);
            return Ok(());
        }
        println!("Type: {}", info.name);
        if let Some(supertype) = &info.supertype {
            println!("  Extends: {}", supertype);
        }
        println!("  Abstract: {}", info.is_abstract);
        println!("  Content: {}", info.content);
        println!("  Features:");
        for feature in &info.features {
            let max = feature
                .max_occurs
                .map(|m| m.to_string())
                .unwrap_or_else(|| "*".to_string());
            print!(
                "    {} ({} {}) [{}..{}]",
                feature.name, feature.kind, feature.feature_type, feature.min_occurs, max
            );
            if let Some(default) = &feature.default {
                print!(" default={:?}", default);
            }
            println!();
        }
        return Ok(());
    }

    if json_output {
        println!("{}", dump.to_json()?);
        return Ok(());
    }

    println!("Target namespace: {}", dump.target_namespace.as_deref().unwrap_or("(none)"));
    println!();
    println!("Global elements ({}):", dump.global_elements.len());
    for element in &dump.global_elements {
        println!("  {} : {}", element.name, element.element_type);
    }
    println!();
    println!("Types ({}):", dump.types.len());
    for ty in &dump.types {
        let marker = if ty.is_abstract { " (abstract)" } else { "" };
        println!("  {}{}", ty.name, marker);
    }
    println!();
    println!("Enumerations ({}):", dump.enumerations.len());
    for enumeration in &dump.enumerations {
        let literals: Vec<&str> = enumeration.literals.iter().map(|l| l.literal.as_str()).collect();
        println!("  {}: {}", enumeration.name, literals.join(" | "));
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_check(file: PathBuf, mode: String) -> Result<(), Box<dyn std::error::Error>> {
    let mode: ReadMode = mode.to_lowercase().parse()?;
    let codec = Codec::with_config(Registry::wcs10()?, CodecConfig::new().with_mode(mode));

    match codec.read_file(&file) {
        Ok(parsed) if parsed.is_clean() => {
            let root = parsed
                .document
                .root_element()
                .map(ToString::to_string)
                .unwrap_or_default();
            println!("✓ Document is valid ({})", root);
            Ok(())
        }
        Ok(parsed) => {
            println!("✗ Document has problems");
            println!();
            println!("Errors:");
            for diagnostic in &parsed.diagnostics {
                println!("  - {}", diagnostic);
            }
            std::process::exit(1);
        }
        Err(e) => {
            println!("✗ Document is invalid");
            println!();
            println!("Errors:");
            for diagnostic in e.diagnostics() {
                println!("  - {}", diagnostic);
            }
            if e.diagnostics().is_empty() {
                println!("  - {}", e);
            }
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "cli")]
fn cmd_roundtrip(
    file: PathBuf,
    output: Option<PathBuf>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = if compact {
        CodecConfig::new().with_indent(None)
    } else {
        CodecConfig::new()
    };
    let codec = Codec::with_config(Registry::wcs10()?, config);

    let parsed = codec.read_file(&file)?;
    if let Some(output_path) = output {
        codec.write_file(&parsed.document, output_path)?;
    } else {
        println!("{}", codec.write_document(&parsed.document)?);
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
