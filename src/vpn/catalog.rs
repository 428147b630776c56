//! Ordered catalog of menu actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::CanonicalState;

/// A menu entry and the `protonvpn` subcommand it triggers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuAction {
    /// User-facing label, unique within the catalog.
    pub label: String,
    /// Subcommand and arguments, whitespace separated (e.g. `connect --cc jp`).
    pub command: String,
}

impl MenuAction {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// Connect variants followed by the session actions (refresh, disconnect).
///
/// The offered menu is always either the connect prefix or the whole list.
#[derive(Clone, Debug)]
pub struct ActionCatalog {
    actions: Vec<MenuAction>,
    connect_count: usize,
}

impl ActionCatalog {
    /// Builds a catalog, rejecting empty labels or commands and duplicate labels.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] naming the offending label.
    pub fn new(connect: Vec<MenuAction>, session: Vec<MenuAction>) -> Result<Self, CatalogError> {
        if connect.is_empty() {
            return Err(CatalogError::NoConnectActions);
        }

        let connect_count = connect.len();
        let actions: Vec<MenuAction> = connect.into_iter().chain(session).collect();

        for (i, action) in actions.iter().enumerate() {
            if action.label.trim().is_empty() {
                return Err(CatalogError::EmptyLabel);
            }
            if action.command.trim().is_empty() {
                return Err(CatalogError::EmptyCommand(action.label.clone()));
            }
            if actions[..i].iter().any(|a| a.label == action.label) {
                return Err(CatalogError::DuplicateLabel(action.label.clone()));
            }
        }

        Ok(Self {
            actions,
            connect_count,
        })
    }

    /// Looks an action up by its exact label.
    pub fn resolve(&self, label: &str) -> Option<&MenuAction> {
        self.actions.iter().find(|a| a.label == label)
    }

    /// Actions to offer from `state`: everything when connected, otherwise
    /// only the connect variants.
    pub fn offered(&self, state: CanonicalState) -> &[MenuAction] {
        match state {
            CanonicalState::Connected => &self.actions,
            CanonicalState::Working | CanonicalState::Disconnected | CanonicalState::Error => {
                &self.actions[..self.connect_count]
            }
        }
    }

    /// Labels of [`Self::offered`], in catalog order.
    pub fn offered_labels(&self, state: CanonicalState) -> Vec<&str> {
        self.offered(state)
            .iter()
            .map(|a| a.label.as_str())
            .collect()
    }
}

/// Invalid catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// At least one connect action is required.
    NoConnectActions,
    /// A label is blank.
    EmptyLabel,
    /// The action with this label has no command.
    EmptyCommand(String),
    /// Two actions share this label.
    DuplicateLabel(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConnectActions => write!(f, "at least one connect action is required"),
            Self::EmptyLabel => write!(f, "menu labels must not be empty"),
            Self::EmptyCommand(label) => write!(f, "action '{label}' has no command"),
            Self::DuplicateLabel(label) => write!(f, "duplicate menu label '{label}'"),
        }
    }
}

impl std::error::Error for CatalogError {}
