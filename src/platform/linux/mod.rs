//! Linux implementations: process execution, sway IPC and bemenu.

pub mod bemenu;
pub mod process;
pub mod sway;
