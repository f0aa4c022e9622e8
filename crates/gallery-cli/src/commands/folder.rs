//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_entity::Category;
use gallery_entity::folder::{CategorySummary, FolderSummary};

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Show the folder tree
    Tree {
        /// Only this category (display name or slug)
        #[arg(short, long)]
        category: Option<Category>,
        /// Max depth below the category root
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// List folders, optionally only the direct children of a path
    List {
        /// Category or folder path, e.g. "Branding/Logos"
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Create a sub folder
    Create {
        /// Category or folder path to create under
        #[arg(short, long)]
        parent: String,
        /// Folder name
        #[arg(short, long)]
        name: String,
    },
    /// Rename a folder
    Rename {
        /// Folder path
        #[arg(short, long)]
        path: String,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete an empty folder
    Delete {
        /// Folder path
        #[arg(short, long)]
        path: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Path
    path: String,
    /// Depth
    depth: usize,
    /// Sub folders
    folders: u64,
    /// Files, including sub folders
    files: u64,
}

impl From<&FolderSummary> for FolderRow {
    fn from(f: &FolderSummary) -> Self {
        Self {
            id: f.id.clone(),
            name: f.name.clone(),
            path: f.path.clone(),
            depth: f.depth,
            folders: f.child_count,
            files: f.file_count,
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let manager = super::load_manager(config).await?;

    match &args.command {
        FolderCommand::Tree { category, depth } => {
            let summary: Vec<CategorySummary> = manager
                .inspect(|s| s.tree.summary())
                .await
                .into_iter()
                .filter(|c| category.is_none_or(|wanted| c.category == wanted))
                .collect();

            match format {
                OutputFormat::Json => output::print_json(&summary),
                OutputFormat::Table => {
                    for root in &summary {
                        println!("{}/ ({} files)", root.name, root.file_count);
                        print_folders(&root.folders, 1, depth.unwrap_or(usize::MAX));
                    }
                }
            }
        }
        FolderCommand::List { path } => {
            let summary = manager.inspect(|s| s.tree.summary()).await;
            let mut rows = Vec::new();
            match path {
                None => {
                    for root in &summary {
                        flatten(&root.folders, &mut rows);
                    }
                }
                Some(path) => {
                    let children = find_children(&summary, path)
                        .ok_or_else(|| AppError::not_found(format!("Folder '{path}' not found")))?;
                    rows.extend(children.iter().map(FolderRow::from));
                }
            }
            output::print_list(&rows, format);
        }
        FolderCommand::Create { parent, name } => {
            let id = manager.create_subfolder(parent, name).await?;
            output::print_success(&format!("Folder '{name}' created (id: {id})"));
        }
        FolderCommand::Rename { path, name } => {
            let outcome = manager.rename_folder(path, name).await?;
            match format {
                OutputFormat::Json => output::print_json(&outcome),
                OutputFormat::Table => output::print_success(&format!(
                    "Renamed '{}' to '{}' (id: {})",
                    outcome.old_path, outcome.new_path, outcome.new_id
                )),
            }
        }
        FolderCommand::Delete { path, yes } => {
            if !super::confirm(&format!("Delete folder '{path}'?"), *yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            manager.delete_folder(path).await?;
            output::print_success(&format!("Folder '{path}' deleted"));
        }
    }

    Ok(())
}

fn print_folders(folders: &[FolderSummary], level: usize, max_depth: usize) {
    if level > max_depth {
        return;
    }
    for folder in folders {
        let indent = "  ".repeat(level);
        println!("{indent}├── {}/ ({} files)", folder.name, folder.file_count);
        print_folders(&folder.children, level + 1, max_depth);
    }
}

fn flatten(folders: &[FolderSummary], rows: &mut Vec<FolderRow>) {
    for folder in folders {
        rows.push(FolderRow::from(folder));
        flatten(&folder.children, rows);
    }
}

fn find_children<'a>(summary: &'a [CategorySummary], path: &str) -> Option<&'a [FolderSummary]> {
    let wanted = gallery_entity::folder::path::normalize_path(path);
    for root in summary {
        if root.name == wanted {
            return Some(&root.folders);
        }
        if let Some(found) = find_in(&root.folders, &wanted) {
            return Some(&found.children);
        }
    }
    None
}

fn find_in<'a>(folders: &'a [FolderSummary], path: &str) -> Option<&'a FolderSummary> {
    folders.iter().find_map(|f| {
        if f.path == path {
            Some(f)
        } else {
            find_in(&f.children, path)
        }
    })
}
