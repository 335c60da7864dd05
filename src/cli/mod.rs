//! CLI interface for Kudos

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kudos")]
#[command(version = "0.1.0")]
#[command(about = "Session-based authentication service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new kudos.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}
