//! VPN connection state types.

use std::fmt;

/// Normalized connection state of the external VPN client.
///
/// Exactly one holds at any time. It is derived from the client's free-form
/// output and is what the status file and the menu logic reason about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalState {
    /// A state-changing command is in flight.
    Working,
    /// A tunnel is established.
    Connected,
    /// No tunnel.
    Disconnected,
    /// The client reported or caused a failure.
    Error,
}

#[cfg(test)]
impl CanonicalState {
    /// All states, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Working,
        Self::Connected,
        Self::Disconnected,
        Self::Error,
    ];
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Working => write!(f, "working"),
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A state plus its free-text payload.
///
/// `detail` carries the server name for `Connected`, a message for `Error`,
/// and is normally empty otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusRecord {
    pub state: CanonicalState,
    pub detail: String,
}

impl StatusRecord {
    pub fn new(state: CanonicalState, detail: impl Into<String>) -> Self {
        Self {
            state,
            detail: detail.into(),
        }
    }

    /// In-progress marker written before every state-changing command.
    pub fn working() -> Self {
        Self::new(CanonicalState::Working, "")
    }

    pub fn connected(server: impl Into<String>) -> Self {
        Self::new(CanonicalState::Connected, server)
    }

    pub fn disconnected() -> Self {
        Self::new(CanonicalState::Disconnected, "")
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(CanonicalState::Error, message)
    }
}
