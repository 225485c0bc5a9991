use catpack::core::report;
use catpack::{import_table, read_package, PackConfig, PackageRequest, Packager, Version};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "catpack")]
#[command(version)]
#[command(about = "Package a catalogue and its metadata into a single archival file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package a CSV table using a TOML metadata descriptor
    Pack {
        /// Path to the CSV table
        csv: PathBuf,

        /// Path to the TOML metadata descriptor
        #[arg(long)]
        meta: PathBuf,

        /// JSON file attached to the package under 'added'
        #[arg(long)]
        extra: Option<PathBuf>,

        /// Skip the placeholder guard (dry runs with template metadata)
        #[arg(long)]
        test_mode: bool,

        /// Output directory (overrides catpack.toml)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the contents of an existing package
    Inspect {
        /// Path to a .catpkg file
        file: PathBuf,
    },
}

/// On-disk shape of the `--meta` descriptor.
#[derive(Deserialize)]
struct MetaFile {
    name: String,
    summary: String,
    user: String,
    contact: String,
    script_name: String,
    version: Version,
    column_descriptions: Vec<String>,
    column_ucds: Vec<String>,
    column_units: Vec<String>,
    readme: String,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            csv,
            meta,
            extra,
            test_mode,
            out,
        } => {
            let descriptor: MetaFile = toml::from_str(&fs::read_to_string(&meta)?)?;
            let table = import_table(&csv)?;
            let extra = match extra {
                Some(path) => Some(serde_json::from_str(&fs::read_to_string(&path)?)?),
                None => None,
            };

            let config = match out {
                Some(dir) => PackConfig::with_output_dir(dir),
                None => PackConfig::load(),
            };

            let request = PackageRequest {
                name: descriptor.name,
                table,
                summary: descriptor.summary,
                user: descriptor.user,
                contact: descriptor.contact,
                script_name: descriptor.script_name,
                version: descriptor.version,
                column_descriptions: descriptor.column_descriptions,
                column_ucds: descriptor.column_ucds,
                column_units: descriptor.column_units,
                readme: descriptor.readme,
                extra,
                test_mode,
            };

            Packager::new(&config).package(request)?;
        }
        Commands::Inspect { file } => {
            let package = read_package(&file)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            report::write_summary(&mut out, &package)?;
        }
    }

    Ok(())
}
