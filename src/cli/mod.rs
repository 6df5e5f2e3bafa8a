//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Clinidoc using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Clinidoc - clinical document rendering
#[derive(Parser, Debug)]
#[command(name = "clinidoc")]
#[command(version, about, long_about = None)]
#[command(author = "Clinidoc Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "clinidoc.toml", env = "CLINIDOC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CLINIDOC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one or more exported records to print-ready documents
    Render(commands::render::RenderArgs),

    /// Re-run conversion from an existing editable artifact
    Reconvert(commands::reconvert::ReconvertArgs),

    /// Delete stale artifacts for a record
    Invalidate(commands::invalidate::InvalidateArgs),

    /// Serve documents over HTTP
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file and templates
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
