//! Status-bar controller core.
//!
//! - `classifier`: maps `protonvpn` output to a canonical state
//! - `codec`: the i3status JSON payload written for the bar
//! - `store`: reading and (re)initializing the status file
//! - `dispatcher`: runs menu actions and persists their outcome
//! - `session`: one click, from window check to dispatch

pub mod classifier;
pub mod codec;
pub mod dispatcher;
pub mod session;
pub mod store;
