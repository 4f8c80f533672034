//! Merge state machine: group eligibility and group mutation.
//!
//! The predicates are pure functions over the slot array so the interactive
//! layer and a headless test suite can share them; the mutation entry points
//! live on [`PageSet`] and are the only writers of merge state.

use crate::compositor::composite;
use crate::page_set::{PageSet, PageSlot};
use crate::types::{MergeMode, PageRaster, Result};
use std::sync::Arc;

/// True iff slot `index` may start a two-page group: a following slot
/// exists, the slot is not consumed by an earlier group and it does not
/// already start one.
pub fn can_start_pair(slots: &[PageSlot], index: usize) -> bool {
    index + 1 < slots.len()
        && slots[index].merge_mode == MergeMode::None
        && !consumed_by_preceding(slots, index)
}

/// True iff slot `index` may start a four-page grid group. Same rules as
/// [`can_start_pair`] but three following slots must exist.
pub fn can_start_grid(slots: &[PageSlot], index: usize) -> bool {
    index + 3 < slots.len()
        && slots[index].merge_mode == MergeMode::None
        && !consumed_by_preceding(slots, index)
}

/// True when `index` falls inside a group started by an earlier slot.
/// A grid lead can sit up to three slots back.
pub(crate) fn consumed_by_preceding(slots: &[PageSlot], index: usize) -> bool {
    (index.saturating_sub(3)..index).any(|lead| {
        let mode = slots[lead].merge_mode;
        mode != MergeMode::None && lead + mode.group_len() > index
    })
}

impl PageSet {
    /// Eligibility check for [`PageSet::apply_merge`].
    pub fn can_merge(&self, index: usize, mode: MergeMode) -> bool {
        match mode {
            MergeMode::None => false,
            MergeMode::Vertical | MergeMode::Horizontal => can_start_pair(&self.slots, index),
            MergeMode::Grid => can_start_grid(&self.slots, index),
        }
    }

    /// Start a merge group of `mode` at `index`.
    ///
    /// Ineligible requests are a no-op returning `false`; the caller is
    /// expected to disable the triggering action when the slot cannot merge.
    /// On success the composite is computed and cached on the lead slot, and
    /// every consumed follower has its own merge state force-cleared, wiping
    /// any stale downstream group.
    pub fn apply_merge(&mut self, index: usize, mode: MergeMode) -> bool {
        if !self.can_merge(index, mode) {
            log::debug!("ignoring ineligible {mode:?} merge at slot {index}");
            return false;
        }
        self.slots[index].merge_mode = mode;
        self.slots[index].merged_raster = None;
        for follower in index + 1..index + mode.group_len() {
            self.slots[follower].merge_mode = MergeMode::None;
            self.slots[follower].merged_raster = None;
        }
        match self.ensure_composite(index) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("composite failed for {mode:?} group at slot {index}: {err}");
                self.slots[index].merge_mode = MergeMode::None;
                self.slots[index].merged_raster = None;
                false
            }
        }
    }

    /// Dissolve the group starting at `index`. No effect on neighbors, and a
    /// no-op for out-of-range indices or slots that start no group.
    pub fn clear_merge(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.merge_mode = MergeMode::None;
            slot.merged_raster = None;
        }
    }

    /// Return the cached composite of the group starting at `index`,
    /// computing and re-caching it if a reorder invalidated it.
    pub(crate) fn ensure_composite(&mut self, index: usize) -> Result<PageRaster> {
        if let Some(cached) = &self.slots[index].merged_raster {
            return Ok(cached.clone());
        }
        let mode = self.slots[index].merge_mode;
        let composed = {
            let group: Vec<&image::RgbaImage> = (index..index + mode.group_len())
                .map(|member| self.slots[member].raster.as_ref())
                .collect();
            Arc::new(composite(mode, &group)?)
        };
        self.slots[index].merged_raster = Some(composed.clone());
        Ok(composed)
    }
}
