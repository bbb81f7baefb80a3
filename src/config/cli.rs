//! Command-line argument definitions for gangway.

use camino::Utf8PathBuf;
use clap::Parser;

/// Command-line interface for gangway.
#[derive(Debug, Parser)]
#[command(name = "gangway")]
#[command(
    author,
    version,
    about = "Browser-facing gateway for a local container engine"
)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Address the HTTP gateway listens on.
    #[arg(long)]
    pub listen_addr: Option<String>,

    /// Container engine socket path or URL, bypassing provider discovery.
    #[arg(long)]
    pub engine_socket: Option<String>,
}
