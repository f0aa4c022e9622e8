//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use gallery_core::config::AppConfig;
use gallery_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check the configuration loads and summarise it
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config),
            OutputFormat::Table => print_summary(config),
        },
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            print_summary(config);
        }
    }

    Ok(())
}

fn print_summary(config: &AppConfig) {
    let timeout = |secs: Option<u64>| {
        secs.map(|s| format!("{s}s"))
            .unwrap_or_else(|| "transport default".to_string())
    };

    output::print_kv("Server", &config.api.base_url);
    output::print_kv("Folders endpoint", &config.api.folders_path);
    output::print_kv("Upload endpoint", &config.api.upload_path);
    output::print_kv("Files endpoint", &config.api.files_path);
    output::print_kv("Request timeout", &timeout(config.api.request_timeout_seconds));
    output::print_kv("Connect timeout", &timeout(config.api.connect_timeout_seconds));
    output::print_kv("Unsorted folder", &config.gallery.unsorted_folder_name);
    output::print_kv(
        "Default sort",
        &format!(
            "{} {:?}",
            config.gallery.default_sort, config.gallery.default_direction
        )
        .to_lowercase(),
    );
    output::print_kv(
        "Logging",
        &format!("{} ({})", config.logging.level, config.logging.format),
    );
}
