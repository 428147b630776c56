//! Application configuration management.
//!
//! Handles config directory resolution (CLI flag / `PROTONBAR_CONFIG_DIR` > XDG > default)
//! and loading `config.toml`. Every setting has a compiled-in default, so the
//! file is optional and may set any subset of fields.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::vpn::{ActionCatalog, CatalogError, MenuAction};

/// User-configurable application settings.
///
/// All fields have sensible defaults. Users can override any subset via
/// `config.toml` in the config directory -- missing fields use defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// VPN client executable, looked up on `PATH` unless it contains a `/`.
    pub vpn_binary: String,
    /// Wrapper for state-changing subcommands. Empty runs them directly.
    pub privilege_command: String,
    /// Arguments placed between the wrapper and the VPN client (e.g. `["-n"]`).
    pub privilege_args: Vec<String>,
    /// Application id of the VPN front-end window.
    pub window_app_id: String,
    /// Sway IPC client used to inspect and focus windows.
    pub window_manager_command: String,
    /// Menu program; labels are fed on stdin, the choice is read from stdout.
    pub menu_command: String,
    /// Menu prompt text.
    pub menu_prompt: String,
    /// Extra arguments for the menu program.
    pub menu_args: Vec<String>,
    /// Connect variants, offered in every idle state.
    pub connect_actions: Vec<MenuAction>,
    /// Actions appended to the menu while connected.
    pub session_actions: Vec<MenuAction>,
    /// Minimum log level (`"debug"`, `"info"`, `"warning"`, `"error"`).
    pub log_level: String,
    /// Write logs to `<config_dir>/logs/protonbar.log`.
    pub log_file: bool,
    /// Maximum log file size in bytes before rotation (default: 1 MiB).
    pub log_rotation_size: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vpn_binary: constants::DEFAULT_VPN_BINARY.to_string(),
            privilege_command: constants::DEFAULT_PRIVILEGE_COMMAND.to_string(),
            privilege_args: Vec::new(),
            window_app_id: constants::DEFAULT_WINDOW_APP_ID.to_string(),
            window_manager_command: constants::DEFAULT_WINDOW_MANAGER_COMMAND.to_string(),
            menu_command: constants::DEFAULT_MENU_COMMAND.to_string(),
            menu_prompt: constants::DEFAULT_MENU_PROMPT.to_string(),
            menu_args: Vec::new(),
            connect_actions: to_actions(&constants::DEFAULT_CONNECT_ACTIONS),
            session_actions: to_actions(&constants::DEFAULT_SESSION_ACTIONS),
            log_level: constants::DEFAULT_LOG_LEVEL.to_string(),
            log_file: true,
            log_rotation_size: constants::DEFAULT_LOG_ROTATION_SIZE,
        }
    }
}

impl AppConfig {
    /// Builds the menu catalog from the configured actions.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the configured actions are unusable.
    pub fn catalog(&self) -> Result<ActionCatalog, CatalogError> {
        ActionCatalog::new(self.connect_actions.clone(), self.session_actions.clone())
    }

    /// Path of the log file, or `None` when file logging is off.
    pub fn log_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.log_file.then(|| {
            config_dir
                .join(constants::LOGS_DIR_NAME)
                .join(constants::LOG_FILE_NAME)
        })
    }
}

fn to_actions(pairs: &[(&str, &str)]) -> Vec<MenuAction> {
    pairs
        .iter()
        .map(|(label, command)| MenuAction::new(*label, *command))
        .collect()
}

/// Resolves the config directory path.
///
/// Precedence: CLI flag / `PROTONBAR_CONFIG_DIR` > `XDG_CONFIG_HOME` > `~/.config`.
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined or created.
pub fn resolve_config_dir(cli_override: Option<&PathBuf>) -> std::io::Result<PathBuf> {
    let path = if let Some(dir) = cli_override {
        // Resolve relative paths to absolute so the config dir is stable
        // regardless of the working directory.
        if dir.is_relative() {
            std::env::current_dir()?.join(dir)
        } else {
            dir.clone()
        }
    } else {
        default_config_dir()?
    };

    if !path.exists() {
        std::fs::create_dir_all(&path)?;
    }

    // Canonicalize to resolve symlinks and ".." components
    std::fs::canonicalize(&path)
}

/// Computes the default config directory (no CLI override).
fn default_config_dir() -> std::io::Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let xdg_path = PathBuf::from(xdg);
        if xdg_path.is_absolute() {
            return Ok(xdg_path.join(constants::APP_NAME));
        }
    }

    let home = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Home directory not found")
    })?;
    Ok(home.join(".config").join(constants::APP_NAME))
}

/// Loads `AppConfig` from `config.toml` in the given directory.
///
/// Returns defaults if the file doesn't exist. Returns an error if the file
/// exists but is malformed or describes an unusable menu.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed or validated.
pub fn load_config(config_dir: &Path) -> Result<AppConfig, String> {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| format!("Failed to read {}: {e}", config_path.display()))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| format!("Invalid config at {}: {e}", config_path.display()))?;

    config
        .catalog()
        .map_err(|e| format!("Invalid menu in {}: {e}", config_path.display()))?;

    Ok(config)
}
