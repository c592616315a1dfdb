//! Command line interface

pub mod serve;

use clap::{Parser, Subcommand};

/// Glossa API - scoped API keys for translation repositories
#[derive(Parser)]
#[command(name = "glossa-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),
}
