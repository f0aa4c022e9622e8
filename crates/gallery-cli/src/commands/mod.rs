//! CLI command definitions and dispatch.

pub mod config;
pub mod file;
pub mod folder;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use gallery_client::HttpFolderApi;
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_entity::folder::path::split_path;
use gallery_entity::{Category, ParentRef};
use gallery_service::FolderTreeManager;

use crate::output::OutputFormat;

/// Clinic media gallery: browse and organise marketing folders
#[derive(Debug, Parser)]
#[command(name = "gallery", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/<env>.toml`)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Folder(args) => folder::execute(args, &config, self.format).await,
            Commands::File(args) => file::execute(args, &config, self.format).await,
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
        }
    }
}

/// Helper: connect to the gallery server and load the tree
pub async fn load_manager(config: &AppConfig) -> Result<FolderTreeManager, AppError> {
    let api = HttpFolderApi::new(&config.api)?;
    let manager = FolderTreeManager::new(Arc::new(api), config.gallery.clone());
    manager.reload().await?;
    Ok(manager)
}

/// Helper: point the manager's breadcrumb at a category root or folder path
pub async fn navigate_to(manager: &FolderTreeManager, path: &str) -> Result<(), AppError> {
    let segments = split_path(path);
    let Some(first) = segments.first() else {
        return Ok(());
    };
    let category: Category = first.parse()?;
    manager.open_category(category).await?;

    let target = manager
        .inspect(|s| s.tree.resolve_parent(path))
        .await
        .ok_or_else(|| AppError::not_found(format!("Folder '{path}' not found")))?;

    if let ParentRef::Folder(idx) = target {
        let trail: Vec<String> = manager
            .inspect(|s| {
                s.tree
                    .ancestry(idx)
                    .into_iter()
                    .map(|i| s.tree.node(i).id.clone())
                    .collect()
            })
            .await;
        for id in trail {
            manager.open_folder(&id).await?;
        }
    }
    Ok(())
}

/// Helper: ask before doing something destructive unless `--yes` was given
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, AppError> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
