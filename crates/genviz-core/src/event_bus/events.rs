//! Event type definitions for the event bus.
//!
//! Highlight events are the only traffic the bus carries: a viewer publishes
//! a select/deselect for a set of targets, and every live viewer (including
//! the publisher) resolves those targets against its own rendering. Events
//! are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Whether targets are being highlighted or cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightAction {
    /// Mark the targets (and each viewer's hovering state) active.
    Select,
    /// Clear the targets and the hovering state.
    Deselect,
}

impl std::fmt::Display for HighlightAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HighlightAction::Select => write!(f, "select"),
            HighlightAction::Deselect => write!(f, "deselect"),
        }
    }
}

impl FromStr for HighlightAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "select" => Ok(HighlightAction::Select),
            "deselect" => Ok(HighlightAction::Deselect),
            other => Err(CoreError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

/// What a highlight event points at.
///
/// Exactly one kind of target per event. Gene targets win over family
/// targets by construction: an event carries one or the other, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightTarget {
    /// Individual features, addressed by their identifiers.
    Genes(Vec<String>),
    /// Whole families (categories), addressed by their identifiers.
    Families(Vec<String>),
}

impl HighlightTarget {
    /// Build a gene target from any collection of identifiers.
    pub fn genes<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HighlightTarget::Genes(ids.into_iter().map(Into::into).collect())
    }

    /// Build a family target from any collection of identifiers.
    pub fn families<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HighlightTarget::Families(ids.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-joined family string ("f1,f2") into a family target.
    ///
    /// This is the wire format legacy hosts publish family selections in.
    /// Blank entries are dropped; a string with no usable entries is an
    /// error rather than a target that silently matches nothing.
    pub fn families_from_list(list: &str) -> Result<Self> {
        let ids: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            return Err(CoreError::EmptyTargetList);
        }
        Ok(HighlightTarget::Families(ids))
    }

    /// The comma-joined family string, if this is a family target.
    pub fn family_list(&self) -> Option<String> {
        match self {
            HighlightTarget::Families(ids) => Some(ids.join(",")),
            HighlightTarget::Genes(_) => None,
        }
    }

    /// The target identifiers, whichever kind they are.
    pub fn ids(&self) -> &[String] {
        match self {
            HighlightTarget::Genes(ids) | HighlightTarget::Families(ids) => ids,
        }
    }

    /// True when the target carries no identifiers at all.
    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}

/// A highlight/selection event carried between viewers.
///
/// Immutable value: constructed by a publisher, consumed by all subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightEvent {
    /// Select or deselect.
    pub action: HighlightAction,
    /// What the action applies to.
    pub target: HighlightTarget,
}

impl HighlightEvent {
    /// A select event for the given target.
    pub fn select(target: HighlightTarget) -> Self {
        HighlightEvent {
            action: HighlightAction::Select,
            target,
        }
    }

    /// A deselect event for the given target.
    pub fn deselect(target: HighlightTarget) -> Self {
        HighlightEvent {
            action: HighlightAction::Deselect,
            target,
        }
    }

    /// Short description of this event for logging.
    pub fn description(&self) -> String {
        match &self.target {
            HighlightTarget::Genes(ids) => format!("{} genes [{}]", self.action, ids.join(",")),
            HighlightTarget::Families(ids) => {
                format!("{} families [{}]", self.action, ids.join(","))
            }
        }
    }
}
