//! CLI tool for schema inspection and project file maintenance.
//!
//! Provides commands for:
//! - Dumping the registered schema (text or JSON)
//! - Validating and summarizing `.gguser` documents
//! - Normalizing older documents to the current schema
//! - Creating default projects

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use gg_project::schema::project_registry;
use gg_project::{ProjectStore, UserFile};
use gg_schema_core::describe;

/// Command-line arguments for the project tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the registered schema tables
    Schema {
        /// Emit machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Load a project document and report its contents
    Validate {
        /// Path to the .gguser file
        file: PathBuf,
    },
    /// Load a project document and rewrite it with the current schema
    Normalize {
        /// Path to the .gguser file
        file: PathBuf,
    },
    /// Write a default project document
    New {
        /// Path of the .gguser file to create
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let registry = Arc::new(project_registry().context("failed to build schema registry")?);

    match args.command {
        Command::Schema { json } => {
            let description = describe::describe(&registry);
            if json {
                println!("{}", serde_json::to_string_pretty(&description)?);
            } else {
                print_schema(&description);
            }
        }
        Command::Validate { file } => {
            let (store, name) = store_for(&file, registry)?;
            let project = store.load(&name)?;
            print_summary(&file, &project)?;
        }
        Command::Normalize { file } => {
            let (store, name) = store_for(&file, registry)?;
            let project = store.load(&name)?;
            let path = store.save(&project, &name)?;
            println!("Normalized {}", path.display());
        }
        Command::New { file } => {
            let (store, name) = store_for(&file, registry.clone())?;
            let project = UserFile::new(registry)?;
            let path = store.save(&project, &name)?;
            println!("Created {}", path.display());
        }
    }

    Ok(())
}

/// Splits a file path into a store rooted at its directory plus the
/// document name.
fn store_for(
    file: &Path,
    registry: Arc<gg_schema_core::SchemaRegistry>,
) -> Result<(ProjectStore, String)> {
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
        bail!("'{}' has no usable file name", file.display());
    };
    Ok((ProjectStore::new(dir, registry), name.to_string()))
}

fn print_schema(description: &describe::RegistryDescription) {
    for enumeration in &description.enums {
        println!("enum {}", enumeration.name);
        for item in &enumeration.items {
            println!("    {} = {}", item.name, item.ordinal);
        }
        println!();
    }
    for strukt in &description.structs {
        println!("struct {}", strukt.name);
        for field in &strukt.fields {
            let mut line = format!("    {}: {} = {}", field.name, field.ty, field.default);
            if field.no_serialize {
                line.push_str("  (runtime only)");
            }
            println!("{line}");
        }
        println!();
    }
}

fn print_summary(path: &Path, project: &UserFile) -> Result<()> {
    println!("{}", path.display());
    println!("  version: {}", project.version()?);
    println!(
        "  imported resources: {}",
        project.imported_resources()?.len()
    );
    println!(
        "  saved variables: {}",
        project.root().slice_field("savedVariables")?.len()
    );
    println!("  bookmarks: {}", project.bookmarks()?.len());
    println!(
        "  presets: {}",
        project.root().slice_field("importedResourcePresets")?.len()
    );
    Ok(())
}
