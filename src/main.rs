//! # protonbar
//!
//! `ProtonVPN` controller for an i3status/sway status bar. Each invocation is
//! one click on the bar block: it either focuses the VPN front end, shows a
//! connect/disconnect menu and runs the chosen action, or does nothing while
//! an action is already in flight. The result is persisted as an i3status
//! JSON block in the status file given on the command line.
//!
//! ## Modules
//! - [`app`]: Wiring of the controller to the real system.
//! - [`cli`]: Command-line argument parsing.
//! - [`config`]: Configuration management.
//! - [`core`]: Classifier, status codec, status file, dispatcher and session.
//! - [`platform`]: Process, window manager and menu seams.
//! - [`vpn`]: `protonvpn` client wrapper and the action catalog.

mod app;
mod cli;
mod config;
mod constants;
mod core;
mod logger;
mod platform;
mod state;
mod utils;
mod vpn;

use app::App;
use clap::Parser;
use cli::args::Args;
use color_eyre::Result;
use crate::core::session::Outcome;
use logger::LogLevel;

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse arguments
    let args = Args::parse();

    // Resolve config directory (CLI flag / env > XDG > default)
    let config_dir = config::resolve_config_dir(args.config_dir.as_ref())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to resolve config directory: {e}"))?;

    // Load config.toml (or use defaults)
    let app_config = match config::load_config(&config_dir) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("Fix the file or remove it to use defaults:");
            eprintln!("  nano {}/{}", config_dir.display(), constants::CONFIG_FILE_NAME);
            eprintln!("  rm {}/{}", config_dir.display(), constants::CONFIG_FILE_NAME);
            std::process::exit(1);
        }
    };

    logger::configure(
        &app_config.log_level,
        logger::LogSinks {
            file: app_config.log_path(&config_dir),
            stderr: args.verbose,
            rotation_size: app_config.log_rotation_size,
        },
    );
    logger::log(
        LogLevel::Info,
        "APP",
        format!(
            "Starting {} {} (status file {})",
            constants::APP_NAME,
            env!("CARGO_PKG_VERSION"),
            args.status_path.display()
        ),
    );

    let app = App::new(app_config, args.status_path)?;
    match app.run() {
        Ok(Outcome::Dispatched(record)) => {
            logger::log(
                LogLevel::Info,
                "APP",
                format!("Done: {} '{}'", record.state, record.detail),
            );
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(e) => {
            logger::log(LogLevel::Error, "APP", e.to_string());
            Err(e.into())
        }
    }
}
