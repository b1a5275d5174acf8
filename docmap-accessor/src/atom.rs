//! Update atoms: the per-field operation handed to the store on save.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The operation needed to bring one stored field in line with memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UpdateAtom {
    /// Overwrite the stored field with a literal value.
    Replace { value: Value },

    /// Add-to-set and remove-from-set against the stored array.
    Patch {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        adds: Vec<Value>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        removes: Vec<Value>,
    },
}

impl UpdateAtom {
    /// Builds a patch, or `None` when both halves are empty.
    #[must_use]
    pub fn patch(adds: Vec<Value>, removes: Vec<Value>) -> Option<Self> {
        if adds.is_empty() && removes.is_empty() {
            None
        } else {
            Some(Self::Patch { adds, removes })
        }
    }

    /// Returns true for a patch that changes nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Patch { adds, removes } if adds.is_empty() && removes.is_empty())
    }

    #[must_use]
    pub fn is_replace(&self) -> bool {
        matches!(self, Self::Replace { .. })
    }
}
