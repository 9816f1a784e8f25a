use clap::Parser;
use std::path::PathBuf;

pub mod auth;
pub mod config;
pub mod error;
pub mod printer;
pub mod reporter;
pub mod reporting;
pub mod timer;
pub mod transport;

pub use error::{Error, Result};

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Path to JSON key file
    #[arg(short, long)]
    pub keyfile: PathBuf,

    /// Google Analytics View ID
    #[arg(short, long)]
    pub view_id: String,
}
