//! File management CLI commands.

use std::path::PathBuf;

use bytes::Bytes;
use clap::{Args, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tabled::Tabled;

use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_core::types::{SortDirection, SortKey};
use gallery_entity::{FileId, MediaFile, MediaType};
use gallery_service::{GalleryQuery, LeafAssignment};

use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// List files at a category or folder, filtered and sorted
    List {
        /// Category or folder path; omit for every file
        #[arg(short, long)]
        path: Option<String>,
        /// Only this media type (image, video, clip)
        #[arg(short = 't', long = "type")]
        media_type: Option<MediaType>,
        /// Only files from this origin category
        #[arg(long)]
        category: Option<String>,
        /// Only favourites
        #[arg(long)]
        favorites: bool,
        /// Search name, tags and category
        #[arg(short, long)]
        search: Option<String>,
        /// Sort key (date, name, size, views)
        #[arg(long)]
        sort: Option<SortKey>,
        /// Sort direction (asc, desc)
        #[arg(long)]
        direction: Option<SortDirection>,
    },
    /// Upload a local file into a category root or a folder without sub folders
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Target category or folder path
        #[arg(short, long)]
        folder: String,
        /// Override file name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Delete a file from the server
    Delete {
        /// File ID
        id: FileId,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Preview moving a file into a folder (first leaf if the folder has sub folders)
    Move {
        /// File ID
        id: FileId,
        /// Target folder ID
        #[arg(short, long)]
        to: String,
    },
    /// Preview starring or unstarring a file
    Favorite {
        /// File ID
        id: FileId,
    },
    /// Preview a random redistribution of every file
    Distribute {
        /// Seed for a repeatable shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: FileId,
    /// Name
    name: String,
    /// Type
    #[tabled(rename = "type")]
    media_type: String,
    /// Size
    size: String,
    /// Date
    date: String,
    /// Views
    views: u64,
    /// Starred
    favorite: bool,
}

impl From<MediaFile> for FileRow {
    fn from(f: MediaFile) -> Self {
        Self {
            id: f.id,
            name: f.name,
            media_type: f.media_type.to_string(),
            size: f.size,
            date: f.date,
            views: f.views,
            favorite: f.favorite,
        }
    }
}

/// Redistribution display row
#[derive(Debug, Serialize, Tabled)]
struct AssignmentRow {
    /// Leaf path
    path: String,
    /// Folder ID
    folder_id: String,
    /// Number of files
    files: usize,
    /// File IDs
    ids: String,
}

impl From<LeafAssignment> for AssignmentRow {
    fn from(a: LeafAssignment) -> Self {
        Self {
            path: a.path,
            folder_id: a.folder_id,
            files: a.file_ids.len(),
            ids: a
                .file_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let manager = super::load_manager(config).await?;

    match &args.command {
        FileCommand::List {
            path,
            media_type,
            category,
            favorites,
            search,
            sort,
            direction,
        } => {
            if let Some(path) = path {
                super::navigate_to(&manager, path).await?;
            }

            let defaults = GalleryQuery::from_config(&config.gallery);
            let query = GalleryQuery {
                media_type: *media_type,
                category: category.clone(),
                favorites_only: *favorites,
                search: search.clone(),
                sort_by: sort.unwrap_or(defaults.sort_by),
                direction: direction.unwrap_or(defaults.direction),
            };

            let rows: Vec<FileRow> = manager
                .query_files(&query)
                .await
                .into_iter()
                .map(FileRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        FileCommand::Upload { file, folder, name } => {
            let file_name = match name {
                Some(name) => name.clone(),
                None => file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::validation(format!("Cannot derive a file name from '{}'", file.display()))
                    })?,
            };

            let content = tokio::fs::read(file)
                .await
                .map_err(|e| AppError::not_found(format!("Failed to read '{}': {e}", file.display())))?;
            let mime = mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .to_string();
            let size = content.len();

            println!("Uploading '{file_name}' ({size} bytes, {mime}) to '{folder}'...");
            manager
                .upload_file(folder, &file_name, &mime, Bytes::from(content))
                .await?;
            output::print_success(&format!("File '{file_name}' uploaded to '{folder}'"));
        }
        FileCommand::Delete { id, yes } => {
            let name = manager
                .inspect(|s| s.files.iter().find(|f| f.id == *id).map(|f| f.name.clone()))
                .await
                .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;

            if !super::confirm(&format!("Delete file '{name}' (id: {id})?"), *yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            manager.delete_file(*id).await?;
            output::print_success(&format!("File '{name}' deleted"));
        }
        FileCommand::Move { id, to } => {
            let folder_id = manager.move_file_to_folder(*id, to).await?;
            let path = manager
                .find_by_id(&folder_id)
                .await
                .map(|f| f.relative_path)
                .unwrap_or_else(|| folder_id.clone());
            output::print_success(&format!("File {id} would be placed in '{path}' ({folder_id})"));
            output::print_warning("Preview only: the gallery server keeps file placement unchanged.");
        }
        FileCommand::Favorite { id } => {
            let favorite = manager.toggle_favorite(*id).await?;
            let state = if favorite { "starred" } else { "unstarred" };
            output::print_success(&format!("File {id} would be {state}"));
            output::print_warning("Preview only: the gallery server keeps favourites unchanged.");
        }
        FileCommand::Distribute { seed } => {
            let assignments = match seed {
                Some(seed) => {
                    let ids: Vec<FileId> =
                        manager.inspect(|s| s.files.iter().map(|f| f.id).collect()).await;
                    let mut rng = StdRng::seed_from_u64(*seed);
                    manager.distribute_files_randomly_with(&ids, &mut rng).await
                }
                None => manager.distribute_files_randomly().await,
            };

            let rows: Vec<AssignmentRow> = assignments.into_iter().map(AssignmentRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_warning("Preview only: the gallery server keeps file placement unchanged.");
            }
        }
    }

    Ok(())
}
