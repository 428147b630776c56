//! Domain state types for protonbar.
//!
//! - `connection`: canonical VPN connection state and the persisted status record

mod connection;

pub use connection::{CanonicalState, StatusRecord};
