//! Per-document page state: ordered slots carrying original identity,
//! raster and merge bookkeeping.
//!
//! The slot index *is* the display and export order; reordering physically
//! swaps slot records so the order, raster, merge mode and composite cache
//! can never drift apart.

use crate::types::{MergeMode, MoveDirection, PageRaster};
use std::sync::Arc;

/// One displayed page position.
#[derive(Debug, Clone)]
pub struct PageSlot {
    /// Position of this page in the source document; stable across reordering
    /// and used for pass-through reconstruction.
    pub(crate) original_index: usize,
    /// Raster displayed and exported for this slot.
    pub(crate) raster: PageRaster,
    /// Merge group this slot starts, if any.
    pub(crate) merge_mode: MergeMode,
    /// Cached composite for the group this slot starts.
    pub(crate) merged_raster: Option<PageRaster>,
}

impl PageSlot {
    pub fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn raster(&self) -> &PageRaster {
        &self.raster
    }

    pub fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }

    pub fn merged_raster(&self) -> Option<&PageRaster> {
        self.merged_raster.as_ref()
    }
}

/// The ordered page slots of one document.
///
/// All mutation goes through [`PageSet::move_slot`], [`PageSet::apply_merge`]
/// and [`PageSet::clear_merge`]; nothing else writes slot fields.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pub(crate) slots: Vec<PageSlot>,
}

impl PageSet {
    /// Create a page set from the rasterizer's output, one slot per page in
    /// source order, with no merges applied.
    pub fn new(rasters: Vec<image::RgbaImage>) -> Self {
        let slots = rasters
            .into_iter()
            .enumerate()
            .map(|(index, raster)| PageSlot {
                original_index: index,
                raster: Arc::new(raster),
                merge_mode: MergeMode::None,
                merged_raster: None,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[PageSlot] {
        &self.slots
    }

    /// Swap the slot at `index` with its neighbor in `direction`.
    ///
    /// The whole slot record moves together. Out-of-bounds targets are a
    /// no-op returning `false`; callers are expected to disable the
    /// triggering control when the move is impossible.
    pub fn move_slot(&mut self, index: usize, direction: MoveDirection) -> bool {
        let target = match direction {
            MoveDirection::Backward => index.checked_sub(1),
            MoveDirection::Forward => index.checked_add(1),
        };
        let Some(target) = target else {
            return false;
        };
        if index >= self.slots.len() || target >= self.slots.len() {
            log::debug!("ignoring move of slot {index}: target out of bounds");
            return false;
        }
        self.slots.swap(index, target);
        self.invalidate_groups_touching(index, target);
        true
    }

    /// Drop the cached composite of every merge group whose span contains
    /// one of the swapped indices; the group's inputs changed, so the cache
    /// is stale. Groups entirely outside the swap keep their cache.
    fn invalidate_groups_touching(&mut self, a: usize, b: usize) {
        for lead in 0..self.slots.len() {
            let mode = self.slots[lead].merge_mode;
            if mode == MergeMode::None {
                continue;
            }
            let span = lead..lead + mode.group_len();
            if (span.contains(&a) || span.contains(&b))
                && self.slots[lead].merged_raster.take().is_some()
            {
                log::debug!("invalidated composite cache of group at slot {lead}");
            }
        }
    }

    /// Human-readable label for the slot at `index`.
    pub fn slot_label(&self, index: usize) -> String {
        let number = index + 1;
        if crate::merge::consumed_by_preceding(&self.slots, index) {
            return format!("page {number} (merged into previous)");
        }
        match self.slots[index].merge_mode {
            MergeMode::None => format!("page {number}"),
            MergeMode::Vertical => format!("page {number} (starts vertical merge)"),
            MergeMode::Horizontal => format!("page {number} (starts horizontal merge)"),
            MergeMode::Grid => format!("page {number} (starts grid merge)"),
        }
    }
}
