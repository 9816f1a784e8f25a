use crate::{
    Args,
    error::{Error, Result},
};
use std::path::PathBuf;

/// Runtime configuration, built once from the command line
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub debug: bool,
    pub keyfile: PathBuf,
    pub view_id: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self::from_args(args)
    }
}

impl Config {
    /// Build the configuration from parsed command line flags
    pub fn from_args(args: Args) -> Self {
        Self {
            debug: args.debug,
            keyfile: args.keyfile,
            view_id: args.view_id,
        }
    }

    /// Default log filter when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    /// Read the service account key file
    pub fn read_key_file(&self) -> Result<Vec<u8>> {
        tracing::debug!(keyfile = %self.keyfile.display(), "Reading key file");

        std::fs::read(&self.keyfile).map_err(|source| {
            tracing::error!("Failed to load credentials for Google Analytics");

            Error::Credentials {
                path: self.keyfile.clone(),
                source,
            }
        })
    }
}
