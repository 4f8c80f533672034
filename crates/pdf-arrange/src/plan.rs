//! Arrangement plans: a serializable script of merge, clear and move
//! operations applied to one document's page set.

use crate::page_set::PageSet;
use crate::types::{MergeMode, MoveDirection};

#[cfg(feature = "serde")]
use crate::types::{ArrangeError, Result};

/// One scripted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlanOp {
    /// Start a merge group at `slot`
    Merge { slot: usize, mode: MergeMode },
    /// Dissolve the group starting at `slot`
    Clear { slot: usize },
    /// Swap `slot` with its neighbor
    Move { slot: usize, direction: MoveDirection },
}

/// Ordered operations to run against a page set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrangementPlan {
    pub operations: Vec<PlanOp>,
}

impl ArrangementPlan {
    /// Load a plan from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let plan = serde_json::from_slice(&bytes)
            .map_err(|e| ArrangeError::Plan(format!("failed to parse plan: {e}")))?;
        Ok(plan)
    }

    /// Save the plan to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ArrangeError::Plan(format!("failed to serialize plan: {e}")))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Run every operation in order. Ineligible merges and out-of-bounds
    /// moves are skipped silently, matching the interactive behavior where
    /// impossible actions are simply not offered.
    pub fn apply(&self, pages: &mut PageSet) {
        for op in &self.operations {
            match *op {
                PlanOp::Merge { slot, mode } => {
                    pages.apply_merge(slot, mode);
                }
                PlanOp::Clear { slot } => pages.clear_merge(slot),
                PlanOp::Move { slot, direction } => {
                    pages.move_slot(slot, direction);
                }
            }
        }
    }
}
