//! fbxbatch CLI - batch static-mesh FBX export

mod encoder_cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fbxbatch_core::prelude::*;

use encoder_cmd::CommandEncoder;

#[derive(Parser)]
#[command(name = "fbxbatch")]
#[command(about = "Batch static-mesh FBX export with per-object sub-folders", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the document's selected objects
    Export {
        /// Document file
        document: PathBuf,

        /// Select objects by name instead of using the document's
        /// selection; the last one becomes the active object
        #[arg(short, long)]
        select: Vec<String>,

        /// External encoder command. It receives the output path as its
        /// last argument and the job parameters as FBXBATCH_* environment
        /// variables.
        #[arg(long)]
        encoder: String,
    },

    /// Copy the active object's sub-folder path onto every selected object
    ApplySubfolder {
        /// Document file
        document: PathBuf,
    },

    /// List selected objects and their sub-folder paths
    List {
        /// Document file
        document: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            document,
            select,
            encoder,
        } => run_export(&document, &select, &encoder),
        Commands::ApplySubfolder { document } => run_apply_subfolder(&document),
        Commands::List { document } => run_list(&document),
    }
}

fn run_export(path: &PathBuf, select: &[String], encoder: &str) -> Result<()> {
    let mut document = load_document(path)?;

    if !select.is_empty() {
        document.scene.clear_selection();
        let mut last = None;
        for name in select {
            let id = document
                .scene
                .object_by_name(name)
                .map(|o| o.id)
                .with_context(|| format!("unknown object: {name}"))?;
            document.scene.select(id);
            last = Some(id);
        }
        if let Some(id) = last {
            document.scene.set_active(id);
        }
    }

    let mut encoder = CommandEncoder::from_command_line(encoder)?;
    let report = document.export(&mut encoder)?;

    println!("{report}");
    for name in &report.skipped {
        eprintln!("skipped {name}: file already exists");
    }
    for (name, reason) in &report.failures {
        eprintln!("failed {name}: {reason}");
    }

    if !report.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_apply_subfolder(path: &PathBuf) -> Result<()> {
    let mut document = load_document(path)?;
    document.apply_sub_folder_to_selection()?;
    document.save()?;

    let active = document
        .scene
        .active()
        .ok_or_else(|| anyhow::anyhow!("no active object"))?;
    println!(
        "Applied sub folder \"{}\" to {} selected objects",
        document.store.sub_folder_path(active),
        document.scene.selected().len()
    );
    Ok(())
}

fn run_list(path: &PathBuf) -> Result<()> {
    let document = load_document(path)?;

    let selected = document.scene.selected();
    if selected.is_empty() {
        println!("Selection empty");
        return Ok(());
    }

    println!("{} objects selected", selected.len());
    for &id in selected {
        let Some(object) = document.scene.object(id) else {
            continue;
        };
        let marker = if document.scene.active() == Some(id) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<32} {}",
            object.name,
            document.store.sub_folder_path(id)
        );
    }
    Ok(())
}

fn load_document(path: &PathBuf) -> Result<Document> {
    Document::load(path).with_context(|| format!("failed to load document {}", path.display()))
}
