use std::path::PathBuf;

use clap::Parser;

/// Environment variable naming the transactions file.
pub const DATA_ENV_VAR: &str = "SUBSCRIPTION_EXPLORER_DATA";

/// File looked up in the working directory when nothing else is given.
pub const DEFAULT_DATA_FILE: &str = "newboshhhsubscriptioncategory.csv";

/// Startup configuration.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "subscription-explorer",
    about = "Explore subscription spending in categorised bank transactions."
)]
pub struct Config {
    /// Transactions file (.csv, .json or .parquet). Loaded once at startup.
    #[arg(env = DATA_ENV_VAR, default_value = DEFAULT_DATA_FILE)]
    pub data_path: PathBuf,
}
