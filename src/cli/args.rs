//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// `ProtonVPN` status-bar controller for i3status/sway: shows a connect menu
/// and keeps the bar's status file in sync
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Status file read by the bar (created if missing)
    #[arg(value_name = "STATUS_PATH")]
    pub status_path: PathBuf,

    /// Override config directory (default: platform config dir, honors `XDG_CONFIG_HOME`)
    #[arg(short = 'C', long, value_name = "DIR", env = "PROTONBAR_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Mirror log lines to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
