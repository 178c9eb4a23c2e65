use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dir_mirror::tree::{list_files, walk_tree};
use dir_mirror::{CopyOptions, DirectoryCopier, EntryKind, RealFileSystem};
use log::warn;

const DESTINATION_ENV: &str = "DIR_MIRROR_DESTINATION";

#[derive(Parser, Debug)]
#[command(name = "dir-mirror")]
#[command(about = "Mirror a directory tree into another location", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy a directory tree, creating the destination as needed
    Copy {
        /// Directory to copy
        source: PathBuf,

        /// Where the mirrored tree is created
        /// (defaults to $DIR_MIRROR_DESTINATION)
        destination: Option<PathBuf>,

        /// Show what would be done without making changes
        #[arg(short, long)]
        dry_run: bool,

        /// Give copied files the modification time of their source
        #[arg(short, long)]
        preserve_times: bool,
    },

    /// Print every file and directory under a root, directories first
    Tree {
        root: PathBuf,
    },

    /// Print the regular files directly inside a directory
    List {
        dir: PathBuf,
    },
}

fn copy_command(
    source: PathBuf,
    destination: Option<PathBuf>,
    dry_run: bool,
    preserve_times: bool,
    verbose: bool,
) -> Result<()> {
    let destination = match destination {
        Some(dir) => dir,
        None => std::env::var(DESTINATION_ENV)
            .map(PathBuf::from)
            .with_context(|| format!("No destination given and ${} is not set", DESTINATION_ENV))?,
    };

    println!("Copying directory tree:");
    println!("  Source: {}", source.display());
    println!("  Destination: {}", destination.display());
    if dry_run {
        println!("  Mode: DRY RUN (no changes will be made)");
    }
    println!();

    let copier = DirectoryCopier::new(RealFileSystem::new());
    let options = CopyOptions {
        dry_run,
        verbose,
        preserve_times,
        cancel: None,
    };

    let report = copier
        .copy(&source, &destination, &options)
        .context("Failed to copy directory tree")?;

    println!("{}", report);

    if !report.failures.is_empty() {
        for failure in &report.failures {
            warn!("{} ({}): {}", failure.path.display(), failure.kind, failure.message);
        }
        anyhow::bail!("{} entries could not be copied", report.failures.len());
    }

    Ok(())
}

fn tree_command(root: &Path) -> Result<()> {
    let entries = walk_tree(root)
        .with_context(|| format!("Failed to walk {}", root.display()))?;

    for entry in entries {
        let marker = match entry.kind {
            EntryKind::Directory => "/",
            EntryKind::File => "",
            EntryKind::Other => "@",
        };
        println!("{}{}{}", "  ".repeat(entry.depth), entry.name, marker);
    }

    Ok(())
}

fn list_command(dir: &Path) -> Result<()> {
    let filesystem = RealFileSystem::new();
    let files = list_files(&filesystem, dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?;

    for file in files {
        if let Some(name) = file.file_name() {
            println!("{}", name.to_string_lossy());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let log_level = if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();

    match cli.command {
        Commands::Copy { source, destination, dry_run, preserve_times } => {
            copy_command(source, destination, dry_run, preserve_times, cli.verbose)
        }
        Commands::Tree { root } => tree_command(&root),
        Commands::List { dir } => list_command(&dir),
    }
}
