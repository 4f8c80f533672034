use crate::page_set::PageSet;
use crate::types::{ExportStatistics, MergeMode};

/// Calculate export statistics for a page set without building the plan.
///
/// Walks the slots the same way the export planner does, including the
/// truncated-group fallback, so the counts always match the plan.
pub fn calculate_statistics(pages: &PageSet) -> ExportStatistics {
    let slots = pages.slots();
    let mut export_units = 0;
    let mut merged_groups = 0;
    let mut passthrough_pages = 0;

    let mut index = 0;
    while index < slots.len() {
        let mode = slots[index].merge_mode();
        let group_len = mode.group_len();
        if mode == MergeMode::None || index + group_len > slots.len() {
            passthrough_pages += 1;
            index += 1;
        } else {
            merged_groups += 1;
            index += group_len;
        }
        export_units += 1;
    }

    ExportStatistics {
        source_pages: slots.len(),
        export_units,
        merged_groups,
        passthrough_pages,
    }
}
