//! Export planning: flattening a page set into the ordered units that the
//! archive and the rebuilt document will contain.

use crate::page_set::PageSet;
use crate::types::{MergeMode, PageRaster, Result};
use std::ops::Range;

/// Where an exported unit's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSource {
    /// Pass-through of the source page at this original index.
    Original(usize),
    /// Composite produced by the given merge mode.
    Composite(MergeMode),
}

/// One output unit: a single original page or a merged composite.
#[derive(Debug, Clone)]
pub struct ExportUnit {
    /// Display label, e.g. "page 3" or "pages 2-5".
    pub label: String,
    /// Raster exported for this unit.
    pub raster: PageRaster,
    /// Slot positions this unit covers.
    pub slots: Range<usize>,
    pub source: UnitSource,
}

/// Ordered sequence of export units for one document.
#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    pub units: Vec<ExportUnit>,
}

impl ExportPlan {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Walk the slots left to right and emit one unit per page or merge group.
///
/// Merged leads reuse the cached composite, recomputing and re-caching it
/// when a reorder invalidated the cache. A group whose trailing members were
/// pushed past the end of the array degenerates to a single unmerged unit
/// for the lead slot.
pub fn plan(pages: &mut PageSet) -> Result<ExportPlan> {
    let mut units = Vec::new();
    let mut index = 0;
    while index < pages.len() {
        let mode = pages.slots[index].merge_mode;
        let group_len = mode.group_len();
        if mode == MergeMode::None || index + group_len > pages.len() {
            if mode != MergeMode::None {
                log::debug!("truncated {mode:?} group at slot {index}; exporting the lead alone");
            }
            let slot = &pages.slots[index];
            units.push(ExportUnit {
                label: format!("page {}", index + 1),
                raster: slot.raster.clone(),
                slots: index..index + 1,
                source: UnitSource::Original(slot.original_index),
            });
            index += 1;
        } else {
            let raster = pages.ensure_composite(index)?;
            units.push(ExportUnit {
                label: format!("pages {}-{}", index + 1, index + group_len),
                raster,
                slots: index..index + group_len,
                source: UnitSource::Composite(mode),
            });
            index += group_len;
        }
    }
    Ok(ExportPlan { units })
}
