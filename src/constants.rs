//! Application-wide constants and configuration values.
//!
//! This module defines the compiled-in defaults used throughout protonbar:
//! external tool names, the default action catalog, status-file payloads and
//! log settings.

// === Application Metadata ===

/// Application name (from Cargo.toml).
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

// === External Tools ===
// Compiled-in defaults. Users can override them via config.toml.

/// `ProtonVPN` command-line client.
pub const DEFAULT_VPN_BINARY: &str = "protonvpn";
/// Read-only subcommand reporting the current connection.
pub const VPN_STATUS_SUBCOMMAND: &str = "status";
/// Privilege-escalation wrapper for state-changing subcommands.
pub const DEFAULT_PRIVILEGE_COMMAND: &str = "sudo";
/// Application id of the VPN front-end window kept in the sway scratchpad.
pub const DEFAULT_WINDOW_APP_ID: &str = "protonvpn";
/// Sway IPC client.
pub const DEFAULT_WINDOW_MANAGER_COMMAND: &str = "swaymsg";
/// Menu presenter.
pub const DEFAULT_MENU_COMMAND: &str = "bemenu";
/// Menu prompt (shield glyph followed by the provider name).
pub const DEFAULT_MENU_PROMPT: &str = "\u{f21b} ProtonVPN";

// === Default Action Catalog ===
// (label, subcommand). Connect variants first: the menu shown while not
// connected is exactly this prefix.

/// Connect variants, offered in every idle state.
pub const DEFAULT_CONNECT_ACTIONS: [(&str, &str); 4] = [
    ("Le plus rapide", "connect -f"),
    ("Japon", "connect --cc jp"),
    ("Pays-Bas", "connect --cc nl"),
    ("Etats-Unis", "connect --cc us"),
];

/// Actions that only make sense on an established connection.
pub const DEFAULT_SESSION_ACTIONS: [(&str, &str); 2] =
    [("Rafraîchir", "refresh"), ("Déconnecter", "disconnect")];

// === Status Details ===

/// Detail persisted when an action fails, and for `Connected` output with no
/// recognisable server name.
pub const MSG_GENERIC_ERROR: &str = "There has been an error.";
/// Detail persisted when the VPN client cannot be found.
pub const MSG_BINARY_MISSING: &str = "Protonvpn not in your path or not installed.";

// === Status File ===

/// Permission bits for the status file (single writer, world-readable for the bar).
pub const STATUS_FILE_MODE: u32 = 0o644;

// === Logging ===

/// Name of the logs subdirectory under the config dir.
pub const LOGS_DIR_NAME: &str = "logs";
/// Log file name.
pub const LOG_FILE_NAME: &str = "protonbar.log";
/// Default minimum log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default log size in bytes before the file is rotated (1 MiB).
pub const DEFAULT_LOG_ROTATION_SIZE: u64 = 1_024 * 1_024;

// === Config ===

/// Name of the user configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";
