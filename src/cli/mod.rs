//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for tntrace using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// tntrace - transaction track-and-trace document generator
#[derive(Parser, Debug)]
#[command(name = "tntrace")]
#[command(version, about, long_about = None)]
#[command(author = "tntrace Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tntrace.toml", env = "TNT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TNT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate track-and-trace documents from input bundles
    Generate(commands::generate::GenerateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
